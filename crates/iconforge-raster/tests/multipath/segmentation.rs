use crate::support::{blank, encode_png, fill_circle, fill_rect};
use iconforge_core::SegmentationError;
use iconforge_raster::{segment_raster, RasterMask};
use iconforge_settings::SegmentationSettings;

#[test]
fn test_single_circle_yields_one_component() {
    let mut image = blank(100, 100);
    fill_circle(&mut image, 50.0, 50.0, 30.0);
    let png = encode_png(image);

    let components = segment_raster(&png, &SegmentationSettings::default()).unwrap();
    assert_eq!(components.len(), 1);
    // 3x upscale plus an 80 px border on every side
    assert_eq!(components[0].mask.dimensions(), (460, 460));
    let area = std::f64::consts::PI * 90.0 * 90.0;
    let count = components[0].pixel_count as f64;
    assert!((count - area).abs() / area < 0.05, "pixel count {}", count);
}

#[test]
fn test_ring_is_one_component() {
    let mut image = blank(100, 100);
    fill_circle(&mut image, 50.0, 50.0, 40.0);
    // Punch the counter back out
    for y in 0..100 {
        for x in 0..100 {
            let dx = x as f64 + 0.5 - 50.0;
            let dy = y as f64 + 0.5 - 50.0;
            if dx * dx + dy * dy <= 20.0 * 20.0 {
                image.put_pixel(x, y, image::Luma([255]));
            }
        }
    }
    let components = segment_raster(&encode_png(image), &SegmentationSettings::default()).unwrap();
    assert_eq!(components.len(), 1);
}

#[test]
fn test_disjoint_shapes_each_get_a_mask() {
    let mut image = blank(120, 60);
    fill_rect(&mut image, 10, 10, 30, 40);
    fill_circle(&mut image, 90.0, 30.0, 20.0);
    fill_rect(&mut image, 55, 50, 5, 5);
    let png = encode_png(image);
    let settings = SegmentationSettings::default();

    let components = segment_raster(&png, &settings).unwrap();
    assert_eq!(components.len(), 3);
    for component in &components {
        let black = component.mask.pixels().filter(|p| p.0[0] == 0).count();
        assert_eq!(black, component.pixel_count);
        assert!(component.pixel_count >= 50);
    }

    // Components partition the foreground exactly
    let total: usize = components.iter().map(|c| c.pixel_count).sum();
    let mask = RasterMask::from_raster(&png, &settings).unwrap();
    assert_eq!(mask.foreground_pixels(), total);
}

#[test]
fn test_specks_below_noise_floor_are_dropped() {
    let mut image = blank(100, 100);
    fill_rect(&mut image, 20, 20, 40, 40);
    // A 2x2 speck becomes roughly 6x6 = 36 px after upscaling
    fill_rect(&mut image, 80, 80, 2, 2);

    let components = segment_raster(&encode_png(image), &SegmentationSettings::default()).unwrap();
    assert_eq!(components.len(), 1);
    assert!(components.iter().all(|c| c.pixel_count >= 50));
}

#[test]
fn test_blank_raster_has_no_shapes() {
    let png = encode_png(blank(64, 64));
    let err = segment_raster(&png, &SegmentationSettings::default()).unwrap_err();
    match err {
        SegmentationError::NoShapes { raster_bytes } => assert_eq!(raster_bytes, png.len()),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_undecodable_raster() {
    let err = segment_raster(b"not a png", &SegmentationSettings::default()).unwrap_err();
    assert!(matches!(err, SegmentationError::Decode { .. }));
}
