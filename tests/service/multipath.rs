use crate::support::{disks_png, scripted_forge, CIRCLE_ICON};
use iconforge::{ErrorClass, IconSource, MultiPathRequest};
use iconforge_svg::SvgDocument;

fn request() -> MultiPathRequest {
    MultiPathRequest::new(IconSource::parse("https://icons.example.com/circle.svg"))
}

#[tokio::test]
async fn test_single_circle_yields_one_path() {
    let (forge, calls) = scripted_forge(CIRCLE_ICON, disks_png(&[(80.0, 80.0)]));

    let merged = forge.multipath(&request()).await.unwrap();
    assert_eq!(merged.path_count(), 1);
    assert_eq!(calls.programs(), vec!["curl", "inkscape", "potrace"]);

    // The rasterizer saw the normalized icon
    let commands = calls.commands.lock().unwrap();
    let svg = String::from_utf8(commands[1].stdin.clone().unwrap()).unwrap();
    assert!(!svg.to_lowercase().contains("currentcolor"));
    assert!(svg.contains("stroke=\"#000000\""));

    let doc = SvgDocument::parse(&merged.to_svg()).unwrap();
    assert_eq!(doc.path_data().len(), 1);
    assert_eq!(doc.width(), Some("160pt"));
}

#[tokio::test]
async fn test_two_shapes_yield_two_paths() {
    let (forge, calls) = scripted_forge(CIRCLE_ICON, disks_png(&[(40.0, 40.0), (120.0, 120.0)]));

    let merged = forge.multipath(&request()).await.unwrap();
    assert_eq!(merged.path_count(), 2);
    assert_ne!(merged.paths[0], merged.paths[1]);
    assert_eq!(calls.programs(), vec!["curl", "inkscape", "potrace", "potrace"]);
}

#[tokio::test]
async fn test_unsupported_scheme_runs_nothing() {
    let (forge, calls) = scripted_forge(CIRCLE_ICON, disks_png(&[(80.0, 80.0)]));
    let request = MultiPathRequest::new(IconSource::parse("ftp://icons.example.com/circle.svg"));

    let err = forge.multipath(&request).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::ClientInput);
    assert_eq!(err.class().status_code(), 400);
    assert!(calls.programs().is_empty());
}

#[tokio::test]
async fn test_non_svg_download_is_client_error() {
    let (forge, calls) = scripted_forge("<html><body>Not found</body></html>", Vec::new());

    let err = forge.multipath(&request()).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::ClientInput);
    assert_eq!(calls.programs(), vec!["curl"]);
}

#[tokio::test]
async fn test_blank_raster_is_processing_error() {
    let (forge, _calls) = scripted_forge(CIRCLE_ICON, disks_png(&[]));

    let err = forge.multipath(&request()).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Processing);
    assert!(err.to_string().starts_with("No shapes found in image"));
}
