use crate::support::test_config;
use iconforge_core::{Error, FnRunner, RasterizeError, ToolCommand, ToolError, ToolOutput};
use iconforge_raster::Rasterizer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="8"/></svg>"#;

fn rasterizer_with<F>(min_output_bytes: usize, handler: F) -> (Rasterizer, Arc<FnRunner<F>>)
where
    F: Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
{
    let mut config = test_config();
    config.rasterizer.min_output_bytes = min_output_bytes;
    let runner = Arc::new(FnRunner::new(handler));
    (Rasterizer::new(config.rasterizer, runner.clone()), runner)
}

#[tokio::test]
async fn test_command_is_headless_pipe() {
    let (rasterizer, _) = rasterizer_with(0, |_: &ToolCommand| Ok(ToolOutput::success(vec![0])));
    let cmd = rasterizer.command(ICON);
    assert_eq!(cmd.program, "inkscape");
    for arg in [
        "--pipe",
        "--export-type=png",
        "--export-filename=-",
        "--export-dpi=1200",
        "--export-background=white",
        "--export-area-drawing",
    ] {
        assert!(cmd.args.iter().any(|a| a == arg), "missing {}", arg);
    }
    assert_eq!(cmd.env.get("DISPLAY"), Some(""));
    assert_eq!(cmd.env.get("DBUS_SESSION_BUS_ADDRESS"), Some(""));
    assert_eq!(cmd.env.get("HOME"), Some("/tmp"));
    assert_eq!(cmd.stdin.as_deref(), Some(ICON.as_bytes()));
    assert_eq!(cmd.timeout.as_secs(), 60);
}

#[tokio::test]
async fn test_retries_until_success() {
    let attempt = AtomicUsize::new(0);
    let (rasterizer, runner) = rasterizer_with(500, move |_: &ToolCommand| {
        match attempt.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(ToolOutput::failure(1, "dbus hiccup")),
            1 => Ok(ToolOutput::success(vec![0u8; 120])),
            _ => Ok(ToolOutput::success(vec![7u8; 900])),
        }
    });

    let png = rasterizer.rasterize(ICON).await.unwrap();
    assert_eq!(png.len(), 900);
    assert_eq!(runner.calls(), 3);
}

#[tokio::test]
async fn test_gives_up_after_three_failures() {
    let (rasterizer, runner) =
        rasterizer_with(500, |_: &ToolCommand| Ok(ToolOutput::failure(134, "crashed")));

    let err = rasterizer.rasterize(ICON).await.unwrap_err();
    assert_eq!(runner.calls(), 3);
    match err {
        Error::Rasterize(RasterizeError::Failed { attempts, detail }) => {
            assert_eq!(attempts, 3);
            assert!(detail.contains("crashed"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_output_reported() {
    let (rasterizer, runner) =
        rasterizer_with(500, |_: &ToolCommand| Ok(ToolOutput::success(vec![0u8; 180])));

    let err = rasterizer.rasterize(ICON).await.unwrap_err();
    assert_eq!(runner.calls(), 3);
    assert!(matches!(
        err,
        Error::Rasterize(RasterizeError::BlankOutput { attempts: 3, bytes: 180 })
    ));
    assert_eq!(
        err.to_string(),
        "Inkscape produced blank output after 3 attempts (180 bytes)"
    );
}

#[tokio::test]
async fn test_timeout_counts_as_failed_attempt() {
    let attempt = AtomicUsize::new(0);
    let (rasterizer, runner) = rasterizer_with(0, move |cmd: &ToolCommand| {
        if attempt.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(ToolError::Timeout {
                program: cmd.program.clone(),
                timeout_ms: 60_000,
            })
        } else {
            Ok(ToolOutput::success(vec![1u8; 10]))
        }
    });

    assert!(rasterizer.rasterize(ICON).await.is_ok());
    assert_eq!(runner.calls(), 2);
}

#[tokio::test]
async fn test_missing_program_is_not_retried() {
    let (rasterizer, runner) = rasterizer_with(0, |cmd: &ToolCommand| {
        Err(ToolError::Spawn {
            program: cmd.program.clone(),
            reason: "No such file or directory".to_string(),
        })
    });

    let err = rasterizer.rasterize(ICON).await.unwrap_err();
    assert_eq!(runner.calls(), 1);
    assert!(matches!(err, Error::Tool(ToolError::Spawn { .. })));
}
