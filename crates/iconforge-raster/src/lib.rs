//! # IconForge Raster
//!
//! The multi-path product: every disjoint visual shape of an icon becomes
//! its own closed path.
//!
//! - **Rasterizer**: Inkscape client with bounded retry
//! - **Segmentation**: threshold, closing and 8-connected component split
//! - **Tracer**: Potrace client, one invocation per component
//! - **Merge**: one filled path per traced sub-path under a shared group

pub mod merge;
pub mod pipeline;
pub mod rasterizer;
pub mod segment;
pub mod tracer;

pub use merge::MergedIconDocument;
pub use pipeline::MultiPathPipeline;
pub use rasterizer::Rasterizer;
pub use segment::{segment_raster, split_components, RasterMask, ShapeComponent};
pub use tracer::{TracedPath, Tracer};
