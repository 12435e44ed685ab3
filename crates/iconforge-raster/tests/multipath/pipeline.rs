use crate::support::{
    blank, black_pixels_in, encode_png, fill_circle, fill_rect, potrace_svg, scripted_tools,
    test_config,
};
use iconforge_core::{Error, ErrorClass, FnRunner, SegmentationError, ToolCommand, ToolOutput, TracingError};
use iconforge_raster::MultiPathPipeline;
use iconforge_svg::{normalize_icon, SvgDocument};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn icon() -> SvgDocument {
    normalize_icon(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#)
        .unwrap()
}

#[tokio::test]
async fn test_single_circle_gives_one_path() {
    let mut image = blank(100, 100);
    fill_circle(&mut image, 50.0, 50.0, 30.0);
    let runner = Arc::new(FnRunner::new(scripted_tools(encode_png(image))));

    let pipeline = MultiPathPipeline::new(&test_config(), runner.clone());
    let merged = pipeline.run(&icon()).await.unwrap();

    assert_eq!(runner.calls(), 2);
    assert_eq!(merged.path_count(), 1);
    let doc = SvgDocument::parse(&merged.to_svg()).unwrap();
    assert_eq!(doc.paths().len(), 1);
    assert_eq!(doc.root.attr("width"), Some("120.000000pt"));
}

#[tokio::test]
async fn test_two_glyphs_give_two_traced_paths() {
    let mut image = blank(160, 80);
    fill_rect(&mut image, 10, 10, 40, 60);
    fill_circle(&mut image, 115.0, 40.0, 30.0);
    let runner = Arc::new(FnRunner::new(scripted_tools(encode_png(image))));

    let pipeline = MultiPathPipeline::new(&test_config(), runner.clone());
    let merged = pipeline.run(&icon()).await.unwrap();

    // One rasterizer call plus one tracer call per glyph
    assert_eq!(runner.calls(), 3);
    assert_eq!(merged.path_count(), 2);
    assert_ne!(merged.paths[0], merged.paths[1]);
    assert!(merged.canvas_mismatches.is_empty());

    let svg = merged.to_svg();
    for d in &merged.paths {
        assert!(svg.contains(&format!("<path d=\"{}\" fill=\"#000000\" stroke=\"none\"/>", d)));
    }
}

#[tokio::test]
async fn test_multiple_subpaths_per_component_are_kept() {
    let mut image = blank(100, 100);
    fill_circle(&mut image, 50.0, 50.0, 30.0);
    let png = encode_png(image);
    let runner = Arc::new(FnRunner::new(move |cmd: &ToolCommand| match cmd.program.as_str() {
        "inkscape" => Ok(ToolOutput::success(png.clone())),
        _ => Ok(ToolOutput::success(potrace_svg(&[
            "M0 0 L10 0 L10 10 Z".to_string(),
            "M2 2 L8 2 L8 8 Z".to_string(),
        ]))),
    }));

    let merged = MultiPathPipeline::new(&test_config(), runner)
        .run(&icon())
        .await
        .unwrap();
    assert_eq!(merged.path_count(), 2);
}

#[tokio::test]
async fn test_tracer_failure_aborts_merge() {
    let mut image = blank(160, 80);
    fill_rect(&mut image, 10, 10, 40, 60);
    fill_rect(&mut image, 100, 10, 40, 60);
    let png = encode_png(image);
    let traced = AtomicUsize::new(0);
    let runner = Arc::new(FnRunner::new(move |cmd: &ToolCommand| match cmd.program.as_str() {
        "inkscape" => Ok(ToolOutput::success(png.clone())),
        _ => {
            if traced.fetch_add(1, Ordering::SeqCst) == 0 {
                let count = black_pixels_in(cmd);
                Ok(ToolOutput::success(potrace_svg(&[format!("M0 0 L{} 0 Z", count)])))
            } else {
                Ok(ToolOutput::failure(2, "potrace: out of memory"))
            }
        }
    }));

    let err = MultiPathPipeline::new(&test_config(), runner)
        .run(&icon())
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Processing);
    match err {
        Error::Tracing(TracingError::Failed { component, detail }) => {
            assert_eq!(component, 2);
            assert_eq!(detail, "potrace: out of memory");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_raster_reports_no_shapes() {
    let png = encode_png(blank(64, 64));
    let size = png.len();
    let runner = Arc::new(FnRunner::new(scripted_tools(png)));

    let err = MultiPathPipeline::new(&test_config(), runner.clone())
        .run(&icon())
        .await
        .unwrap_err();
    assert_eq!(runner.calls(), 1);
    assert!(matches!(
        err,
        Error::Segmentation(SegmentationError::NoShapes { raster_bytes }) if raster_bytes == size
    ));
}
