//! Potrace tracer client
//!
//! Each component mask is sent to Potrace as a binary PGM on stdin and the
//! SVG backend output is read from stdout. No retry.

use crate::segment::ShapeComponent;
use iconforge_core::{Result, ToolCommand, ToolRunner, TracingError};
use iconforge_settings::TracerSettings;
use iconforge_svg::{CanvasMeta, SvgDocument};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Vector output traced from one component
#[derive(Debug, Clone, PartialEq)]
pub struct TracedPath {
    /// Label of the source component
    pub component: u32,
    /// Path data strings in document order
    pub paths: Vec<String>,
    pub canvas: CanvasMeta,
}

impl TracedPath {
    /// Extract path data and canvas metadata from tracer output
    pub fn from_svg(component: u32, svg: &str) -> std::result::Result<Self, TracingError> {
        let doc = SvgDocument::parse(svg).map_err(|e| TracingError::InvalidOutput {
            component,
            reason: e.to_string(),
        })?;
        Ok(Self {
            component,
            paths: doc.path_data().into_iter().map(str::to_string).collect(),
            canvas: CanvasMeta::from_document(&doc),
        })
    }
}

pub struct Tracer {
    settings: TracerSettings,
    runner: Arc<dyn ToolRunner>,
}

impl Tracer {
    pub fn new(settings: TracerSettings, runner: Arc<dyn ToolRunner>) -> Self {
        Self { settings, runner }
    }

    /// The command tracing one encoded mask
    pub fn command(&self, pgm: Vec<u8>) -> ToolCommand {
        ToolCommand::new(
            self.settings.program.clone(),
            Duration::from_secs(self.settings.timeout_secs),
        )
        .args([
            "-".to_string(),
            "--svg".to_string(),
            "-o".to_string(),
            "-".to_string(),
            "--blacklevel".to_string(),
            self.settings.blacklevel.to_string(),
            "--turdsize".to_string(),
            self.settings.turdsize.to_string(),
            "--alphamax".to_string(),
            self.settings.alphamax.to_string(),
            "--opttolerance".to_string(),
            self.settings.opttolerance.to_string(),
        ])
        .stdin(pgm)
    }

    /// Trace one component
    pub async fn trace(&self, component: &ShapeComponent) -> Result<TracedPath> {
        let pgm = component
            .to_pgm()
            .map_err(|e| TracingError::MaskEncoding {
                component: component.id,
                reason: e.to_string(),
            })?;

        let output = self.runner.run(&self.command(pgm)).await?;
        if !output.is_success() {
            return Err(TracingError::Failed {
                component: component.id,
                detail: output.diagnostics(),
            }
            .into());
        }

        let svg = String::from_utf8_lossy(&output.stdout);
        let traced = TracedPath::from_svg(component.id, &svg)?;
        debug!(
            "Component {} ({} px) traced to {} paths",
            component.id,
            component.pixel_count,
            traced.paths.len()
        );
        Ok(traced)
    }
}
