//! Icon retrieval
//!
//! Remote icons are downloaded with curl; local files are read directly.
//! Bytes that are not valid UTF-8 are replaced rather than rejected, and the
//! markup is normalized before either pipeline sees it.

use crate::request::IconSource;
use iconforge_core::{FetchError, Result, ToolCommand, ToolRunner};
use iconforge_settings::FetchSettings;
use iconforge_svg::{normalize_icon, SvgDocument};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct IconFetcher {
    settings: FetchSettings,
    runner: Arc<dyn ToolRunner>,
}

impl IconFetcher {
    pub fn new(settings: FetchSettings, runner: Arc<dyn ToolRunner>) -> Self {
        Self { settings, runner }
    }

    /// The download command for one URL
    pub fn command(&self, url: &str) -> ToolCommand {
        ToolCommand::new(
            self.settings.program.clone(),
            Duration::from_secs(self.settings.timeout_secs),
        )
        .args([
            "-fsSL".to_string(),
            "--max-time".to_string(),
            self.settings.timeout_secs.to_string(),
            "-A".to_string(),
            self.settings.user_agent.clone(),
            url.to_string(),
        ])
    }

    /// Raw markup of the icon
    pub async fn fetch(&self, source: &IconSource) -> Result<String> {
        source.validate()?;
        let bytes = match source {
            IconSource::Url(url) => {
                let output = self.runner.run(&self.command(url)).await.map_err(|e| {
                    FetchError::Unreachable {
                        url: url.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if !output.is_success() {
                    return Err(FetchError::Unreachable {
                        url: url.clone(),
                        reason: output.diagnostics(),
                    }
                    .into());
                }
                output.stdout
            }
            IconSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|e| FetchError::ReadFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?
            }
        };

        info!("Fetched {} bytes from {}", bytes.len(), source);
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fetch and normalize the icon
    pub async fn load(&self, source: &IconSource) -> Result<SvgDocument> {
        let markup = self.fetch(source).await?;
        let icon = parse_icon(&markup)?;
        debug!("Normalized icon: {} paths", icon.paths().len());
        Ok(icon)
    }
}

/// Normalize markup; unreadable markup is a source error
pub fn parse_icon(markup: &str) -> std::result::Result<SvgDocument, FetchError> {
    normalize_icon(markup).map_err(|e| FetchError::NotSvg {
        reason: e.to_string(),
    })
}
