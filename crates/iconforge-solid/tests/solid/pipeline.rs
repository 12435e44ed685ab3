use crate::support::{ModelerLog, LETTER_O, SQUARE_AND_DOT};
use iconforge_core::{Error, ErrorClass, FnRunner, GeometryError, ToolCommand};
use iconforge_settings::Config;
use iconforge_solid::{HoleOrientation, PolygonShape, SolidOptions, SolidPipeline};
use iconforge_svg::SvgDocument;
use std::sync::Arc;

fn pipeline(stl_bytes: usize) -> (SolidPipeline, Arc<ModelerLog>) {
    let log = Arc::new(ModelerLog::default());
    let handler_log = Arc::clone(&log);
    let runner = Arc::new(FnRunner::new(move |cmd: &ToolCommand| {
        handler_log.handle(cmd, stl_bytes)
    }));
    (SolidPipeline::new(&Config::default(), runner), log)
}

#[tokio::test]
async fn test_letter_o_with_base_and_hole() {
    let (pipeline, log) = pipeline(1024);
    let icon = SvgDocument::parse(LETTER_O).unwrap();
    let options = SolidOptions {
        size: 50.0,
        thickness: 2.0,
        base_thickness: 1.0,
        base_offset: 2.0,
        hole_diameter: 3.0,
        ..SolidOptions::default()
    };

    let output = pipeline.run(&icon, &options).await.unwrap();
    assert_eq!(output.stl.len(), 1024);
    // Ring of radius 40 grown by 2 is 84 wide
    assert!((output.scale - 50.0 / 84.0).abs() < 1e-3, "scale {}", output.scale);

    let base = SvgDocument::parse(&log.file("base.svg").unwrap()).unwrap();
    let base_paths = base.path_data();
    assert_eq!(base_paths.len(), 1);
    let base_shape = PolygonShape::from_path_data(base_paths[0], 256).unwrap();
    assert_eq!(base_shape.hole_count(), 0);
    assert_eq!(base.view_box(), Some("0 0 100 100"));

    // The stray circle is not a path, so the main file keeps the ring intact
    let main = SvgDocument::parse(&log.file("main.svg").unwrap()).unwrap();
    assert_eq!(main.paths().len(), 1);

    let script = log.script();
    assert!(script.contains("union() {"));
    assert!(script.contains("import(\"base.svg\")"));
    assert!(script.contains("difference() {"));
    assert!(script.contains("intersection() {"));
    assert!(script.contains("rotate([0, 90, 0])"));
    assert_eq!(output.script, script);
}

#[tokio::test]
async fn test_no_hole_means_no_subtraction() {
    let (pipeline, log) = pipeline(512);
    let icon = SvgDocument::parse(SQUARE_AND_DOT).unwrap();

    let output = pipeline.run(&icon, &SolidOptions::default()).await.unwrap();
    assert_eq!(output.scale, 1.0);

    let script = log.script();
    assert!(!script.contains("difference"));
    assert!(!script.contains("intersection"));
    assert!(log.file("base.svg").is_none());

    // Only the square survives dominant-shape selection
    let main = SvgDocument::parse(&log.file("main.svg").unwrap()).unwrap();
    assert_eq!(main.path_data(), vec!["M20 20 H80 V80 H20 Z"]);
}

#[tokio::test]
async fn test_standalone_measurement_without_base() {
    let (pipeline, log) = pipeline(512);
    let icon = SvgDocument::parse(SQUARE_AND_DOT).unwrap();
    let options = SolidOptions {
        size: 30.0,
        hole_diameter: 2.0,
        hole_orientation: HoleOrientation::Vertical,
        ..SolidOptions::default()
    };

    let output = pipeline.run(&icon, &options).await.unwrap();
    assert!((output.scale - 0.5).abs() < 1e-9);
    let script = log.script();
    assert!(script.contains("rotate([90, 0, 0])"));
    // Square centroid (50, 50) scaled by 0.5, mid-height of a 1 unit extrusion
    let [x, y, z] = hole_translation(&script);
    assert!((x - 25.0).abs() < 1e-6 && (y - 25.0).abs() < 1e-6, "{}", script);
    assert!((z - 0.5).abs() < 1e-9);
}

/// Numbers of the translate() applied to the hole cylinder
fn hole_translation(script: &str) -> [f64; 3] {
    let line = script
        .lines()
        .find(|l| l.contains(") rotate(["))
        .expect("hole line");
    let start = line.find("translate([").expect("translate") + "translate([".len();
    let end = start + line[start..].find(']').expect("closing bracket");
    let numbers: Vec<f64> = line[start..end]
        .split(',')
        .map(|n| n.trim().parse().expect("number"))
        .collect();
    [numbers[0], numbers[1], numbers[2]]
}

#[tokio::test]
async fn test_all_paths_kept_on_request() {
    let (pipeline, log) = pipeline(512);
    let icon = SvgDocument::parse(SQUARE_AND_DOT).unwrap();
    let options = SolidOptions {
        only_largest_path: false,
        ..SolidOptions::default()
    };

    pipeline.run(&icon, &options).await.unwrap();
    let main = SvgDocument::parse(&log.file("main.svg").unwrap()).unwrap();
    assert_eq!(main.paths().len(), 2);
}

#[tokio::test]
async fn test_base_without_path_is_geometry_error() {
    let (pipeline, log) = pipeline(512);
    let icon =
        SvgDocument::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"><circle r="5"/></svg>"#)
            .unwrap();
    let options = SolidOptions {
        base_thickness: 1.0,
        ..SolidOptions::default()
    };

    let err = pipeline.run(&icon, &options).await.unwrap_err();
    assert!(matches!(err, Error::Geometry(GeometryError::NoPath)));
    assert_eq!(err.class(), ErrorClass::GeometryValidation);
    assert!(log.commands.lock().unwrap().is_empty());
}
