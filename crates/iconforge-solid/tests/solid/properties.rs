use iconforge_solid::{keep_dominant_path, scale_factor, PolygonShape};
use iconforge_svg::SvgDocument;
use proptest::prelude::*;

/// Axis-aligned rectangles as `(x, y, w, h)`
fn arb_rects() -> impl Strategy<Value = Vec<(u32, u32, u32, u32)>> {
    prop::collection::vec((0u32..200, 0u32..200, 0u32..80, 0u32..80), 0..6)
}

fn icon(rects: &[(u32, u32, u32, u32)]) -> SvgDocument {
    let mut markup = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 300"><g>"#);
    for (x, y, w, h) in rects {
        markup.push_str(&format!(r#"<path d="M{} {} h{} v{} h-{} z"/>"#, x, y, w, h, w));
    }
    markup.push_str("</g></svg>");
    SvgDocument::parse(&markup).unwrap()
}

proptest! {
    #[test]
    fn dominant_selection_is_idempotent(rects in arb_rects()) {
        let doc = icon(&rects);
        let once = keep_dominant_path(&doc, 64);
        let twice = keep_dominant_path(&once, 64);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.paths().len() <= rects.len().max(1));
    }

    #[test]
    fn scale_factor_maps_width_to_size(size in 0.001f64..10000.0, width in 0.001f64..10000.0) {
        let s = scale_factor(size, width);
        prop_assert!((s - size / width).abs() <= 1e-9 * (size / width).max(1.0));
        prop_assert!((s * width - size).abs() <= 1e-6 * size.max(1.0));
    }

    #[test]
    fn scale_factor_is_identity_without_width(size in 0.0f64..10000.0) {
        prop_assert_eq!(scale_factor(size, 0.0), 1.0);
        prop_assert_eq!(scale_factor(0.0, size), 1.0);
    }

    #[test]
    fn nested_squares_alternate_exterior_and_hole(depth in 1usize..6) {
        let rings: Vec<_> = (0..depth)
            .map(|i| {
                let lo = i as f64 * 10.0;
                let hi = 200.0 - lo;
                vec![
                    lyon::geom::point(lo, lo),
                    lyon::geom::point(hi, lo),
                    lyon::geom::point(hi, hi),
                    lyon::geom::point(lo, hi),
                    lyon::geom::point(lo, lo),
                ]
            })
            .collect();
        let shape = PolygonShape::from_rings(rings).unwrap();
        prop_assert_eq!(shape.parts().len(), depth.div_ceil(2));
        prop_assert_eq!(shape.hole_count(), depth / 2);
    }
}
