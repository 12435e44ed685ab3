//! Request handling
//!
//! Validate → fetch → normalize → pipeline. Every request runs to completion
//! or fails at the first stage error; only immutable configuration is shared
//! between requests.

use crate::fetch::IconFetcher;
use crate::request::{MultiPathRequest, SolidRequest};
use iconforge_core::{ProcessRunner, Result, ToolRunner};
use iconforge_raster::{MergedIconDocument, MultiPathPipeline};
use iconforge_settings::Config;
use iconforge_solid::{ModelInputs, SolidOutput, SolidPipeline};
use std::sync::Arc;
use tracing::info;

pub struct IconForge {
    fetcher: IconFetcher,
    multipath: MultiPathPipeline,
    solid: SolidPipeline,
}

impl IconForge {
    pub fn new(config: &Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            fetcher: IconFetcher::new(config.fetch.clone(), Arc::clone(&runner)),
            multipath: MultiPathPipeline::new(config, Arc::clone(&runner)),
            solid: SolidPipeline::new(config, runner),
        }
    }

    /// Service backed by the real external tools
    pub fn with_process_runner(config: &Config) -> Self {
        Self::new(config, Arc::new(ProcessRunner))
    }

    pub async fn multipath(&self, request: &MultiPathRequest) -> Result<MergedIconDocument> {
        request.validate()?;
        info!("Multi-path request for {}", request.source);
        let icon = self.fetcher.load(&request.source).await?;
        self.multipath.run(&icon).await
    }

    pub async fn solid(&self, request: &SolidRequest) -> Result<SolidOutput> {
        request.validate()?;
        info!("Solid request for {}", request.source);
        let icon = self.fetcher.load(&request.source).await?;
        self.solid.run(&icon, &request.options).await
    }

    /// Everything up to the modeler: the files OpenSCAD would receive
    pub async fn solid_inputs(&self, request: &SolidRequest) -> Result<ModelInputs> {
        request.validate()?;
        let icon = self.fetcher.load(&request.source).await?;
        let (inputs, _scale) = self.solid.prepare(&icon, &request.options)?;
        Ok(inputs)
    }
}
