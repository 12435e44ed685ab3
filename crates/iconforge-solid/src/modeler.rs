//! OpenSCAD modeler client
//!
//! OpenSCAD resolves `import()` relative to the script, so every input is
//! written into a private temporary directory that also receives the STL.
//! The directory is removed when the render finishes, on every exit path.

use iconforge_core::{Result, SolidModelError, ToolCommand, ToolEnv, ToolRunner};
use iconforge_settings::ModelerSettings;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, info};

pub const MAIN_FILE: &str = "main.svg";
pub const BASE_FILE: &str = "base.svg";
pub const SCRIPT_FILE: &str = "script.scad";
pub const OUTPUT_FILE: &str = "output.stl";

/// Files handed to the modeler
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInputs {
    pub main_svg: String,
    pub base_svg: Option<String>,
    pub script: String,
}

pub struct SolidModeler {
    settings: ModelerSettings,
    runner: Arc<dyn ToolRunner>,
}

impl SolidModeler {
    pub fn new(settings: ModelerSettings, runner: Arc<dyn ToolRunner>) -> Self {
        Self { settings, runner }
    }

    /// The command rendering `script.scad` inside `dir`
    pub fn command(&self, dir: &Path) -> ToolCommand {
        ToolCommand::new(
            self.settings.program.clone(),
            Duration::from_secs(self.settings.timeout_secs),
        )
        .args(["-o", OUTPUT_FILE, SCRIPT_FILE])
        .current_dir(dir)
        .env(ToolEnv::no_display())
    }

    /// Render the inputs to STL bytes
    pub async fn render(&self, inputs: &ModelInputs) -> Result<Vec<u8>> {
        let workdir = TempDir::new()?;
        let dir = workdir.path();

        tokio::fs::write(dir.join(MAIN_FILE), &inputs.main_svg).await?;
        if let Some(base) = &inputs.base_svg {
            tokio::fs::write(dir.join(BASE_FILE), base).await?;
        }
        tokio::fs::write(dir.join(SCRIPT_FILE), &inputs.script).await?;
        debug!("Modeler inputs written to {}", dir.display());

        let output = self.runner.run(&self.command(dir)).await?;
        if !output.is_success() {
            return Err(SolidModelError::Failed {
                exit_code: output.exit_code.unwrap_or(-1),
                detail: output.diagnostics(),
            }
            .into());
        }

        // A missing file counts as zero bytes
        let stl = match tokio::fs::read(dir.join(OUTPUT_FILE)).await {
            Ok(stl) => stl,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        if (stl.len() as u64) < self.settings.min_output_bytes {
            return Err(SolidModelError::InvalidOutput {
                bytes: stl.len() as u64,
                detail: output.diagnostics(),
            }
            .into());
        }

        info!("OpenSCAD produced {} bytes of STL", stl.len());
        Ok(stl)
    }
}
