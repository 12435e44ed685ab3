//! Inkscape rasterizer client
//!
//! The icon is piped to Inkscape on stdin and the PNG is read back from
//! stdout. Inkscape is flaky in headless containers, so a failed or blank
//! attempt is retried with a fixed backoff; each attempt's output is
//! discarded unless it succeeds.

use iconforge_core::{RasterizeError, Result, ToolCommand, ToolEnv, ToolError, ToolRunner};
use iconforge_settings::RasterizerSettings;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Why a single attempt was rejected
enum AttemptFailure {
    Failed(String),
    Blank(usize),
    /// The program could not be started at all
    Fatal(ToolError),
}

pub struct Rasterizer {
    settings: RasterizerSettings,
    runner: Arc<dyn ToolRunner>,
}

impl Rasterizer {
    pub fn new(settings: RasterizerSettings, runner: Arc<dyn ToolRunner>) -> Self {
        Self { settings, runner }
    }

    /// The command for one attempt
    pub fn command(&self, svg: &str) -> ToolCommand {
        let mut cmd = ToolCommand::new(
            self.settings.program.clone(),
            Duration::from_secs(self.settings.timeout_secs),
        )
        .args([
            "--pipe".to_string(),
            "--export-type=png".to_string(),
            "--export-filename=-".to_string(),
            format!("--export-dpi={}", self.settings.dpi),
            format!("--export-background={}", self.settings.background),
        ]);
        if self.settings.crop_to_drawing {
            cmd = cmd.arg("--export-area-drawing");
        }
        cmd.env(ToolEnv::headless()).stdin(svg.as_bytes().to_vec())
    }

    /// Rasterize normalized icon markup to PNG bytes
    pub async fn rasterize(&self, svg: &str) -> Result<Vec<u8>> {
        let cmd = self.command(svg);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut last_failure = AttemptFailure::Failed("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            match self.attempt(&cmd).await {
                Ok(png) => {
                    info!(
                        "Inkscape succeeded on attempt {}, PNG size: {} bytes",
                        attempt,
                        png.len()
                    );
                    return Ok(png);
                }
                Err(AttemptFailure::Failed(detail)) => {
                    warn!("Inkscape attempt {} failed: {}", attempt, detail);
                    last_failure = AttemptFailure::Failed(detail);
                }
                Err(AttemptFailure::Blank(bytes)) => {
                    warn!(
                        "Inkscape attempt {} produced tiny/blank PNG ({} bytes)",
                        attempt, bytes
                    );
                    last_failure = AttemptFailure::Blank(bytes);
                }
                Err(AttemptFailure::Fatal(err)) => return Err(err.into()),
            }
            if attempt < max_attempts {
                tokio::time::sleep(Duration::from_millis(self.settings.retry_backoff_ms)).await;
            }
        }

        Err(match last_failure {
            AttemptFailure::Blank(bytes) => RasterizeError::BlankOutput {
                attempts: max_attempts,
                bytes,
            }
            .into(),
            AttemptFailure::Failed(detail) => RasterizeError::Failed {
                attempts: max_attempts,
                detail,
            }
            .into(),
            AttemptFailure::Fatal(err) => err.into(),
        })
    }

    /// Run one attempt; a missing program aborts without retrying
    async fn attempt(&self, cmd: &ToolCommand) -> std::result::Result<Vec<u8>, AttemptFailure> {
        let output = match self.runner.run(cmd).await {
            Ok(output) => output,
            Err(err @ ToolError::Spawn { .. }) => return Err(AttemptFailure::Fatal(err)),
            Err(err) => return Err(AttemptFailure::Failed(err.to_string())),
        };

        if !output.is_success() {
            let code = output
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(AttemptFailure::Failed(format!(
                "rc={}: {}",
                code,
                output.diagnostics()
            )));
        }
        if output.stdout.len() < self.settings.min_output_bytes {
            return Err(AttemptFailure::Blank(output.stdout.len()));
        }
        Ok(output.stdout)
    }
}
