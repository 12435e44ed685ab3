//! Multi-path pipeline
//!
//! Normalized icon → rasterize → segment → trace every component → merge.
//! Stages run strictly in sequence and the first failure aborts the request.

use crate::merge::MergedIconDocument;
use crate::rasterizer::Rasterizer;
use crate::segment::segment_raster;
use crate::tracer::Tracer;
use iconforge_core::{Result, ToolRunner};
use iconforge_settings::{Config, SegmentationSettings};
use iconforge_svg::SvgDocument;
use std::sync::Arc;
use tracing::info;

pub struct MultiPathPipeline {
    rasterizer: Rasterizer,
    tracer: Tracer,
    segmentation: SegmentationSettings,
}

impl MultiPathPipeline {
    pub fn new(config: &Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            rasterizer: Rasterizer::new(config.rasterizer.clone(), Arc::clone(&runner)),
            tracer: Tracer::new(config.tracer.clone(), runner),
            segmentation: config.segmentation.clone(),
        }
    }

    /// Produce the multi-path document for a normalized icon
    pub async fn run(&self, icon: &SvgDocument) -> Result<MergedIconDocument> {
        let png = self.rasterizer.rasterize(&icon.to_markup()).await?;
        info!("PNG rasterized: {} bytes", png.len());

        let components = segment_raster(&png, &self.segmentation)?;
        info!("Found {} components", components.len());

        let mut traced = Vec::with_capacity(components.len());
        for component in &components {
            traced.push(self.tracer.trace(component).await?);
        }

        let merged = MergedIconDocument::merge(traced);
        info!("Traced {} total paths", merged.path_count());
        Ok(merged)
    }
}
