//! Standalone shape measurement
//!
//! Used when no base is requested: the hole is centred on the main shape and
//! the size scaling uses the main shape's width.

use crate::polygon::PolygonShape;
use iconforge_svg::SvgDocument;
use lyon::geom::{point, Point};

/// Shape of the first path with data; `None` when missing or unparsable
fn first_shape(doc: &SvgDocument, samples: usize) -> Option<PolygonShape> {
    let d = doc.path_data().into_iter().next()?;
    PolygonShape::from_path_data(d.trim(), samples).ok()
}

/// Area-weighted centroid of the main shape, `(0, 0)` when nothing parses
pub fn shape_centroid(doc: &SvgDocument, samples: usize) -> Point<f64> {
    first_shape(doc, samples)
        .map(|shape| shape.centroid())
        .unwrap_or_else(|| point(0.0, 0.0))
}

/// Bounding-box width of the main shape, 1.0 when nothing parses or flat
pub fn shape_width(doc: &SvgDocument, samples: usize) -> f64 {
    first_shape(doc, samples)
        .and_then(|shape| shape.bounds())
        .map(|b| b.width())
        .filter(|w| *w > 0.0)
        .unwrap_or(1.0)
}
