//! # IconForge Solid
//!
//! Turns a normalized icon into a printable solid:
//! - [`sampling`] and [`polygon`]: path data to repaired polygon shapes
//! - [`dominant`]: keep only the largest path
//! - [`base`]: filled, outward-grown base outline
//! - [`measure`]: centroid and width of the main shape
//! - [`scad`]: OpenSCAD script synthesis
//! - [`modeler`]: OpenSCAD invocation in a scoped working directory
//! - [`pipeline`]: the stages wired together

pub mod base;
pub mod dominant;
pub mod measure;
pub mod modeler;
pub mod pipeline;
pub mod polygon;
pub mod sampling;
pub mod scad;

pub use base::{build_base, BaseContour};
pub use dominant::{bbox_area, keep_dominant_path};
pub use measure::{shape_centroid, shape_width};
pub use modeler::{ModelInputs, SolidModeler};
pub use pipeline::{scale_factor, SolidOptions, SolidOutput, SolidPipeline};
pub use polygon::{Bounds, Polygon, PolygonShape};
pub use sampling::Ring;
pub use scad::{HoleOrientation, HoleSpec, SolidScript};
