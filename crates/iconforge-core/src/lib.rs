//! # IconForge Core
//!
//! Core types shared by every IconForge crate: the error taxonomy of the
//! fabrication pipelines and the abstraction used to invoke the external
//! rasterizer, tracer, modeler and fetcher.

pub mod error;
pub mod process;

pub use error::{
    Error, ErrorClass, FetchError, GeometryError, ParameterError, RasterizeError, Result,
    SegmentationError, SolidModelError, ToolError, TracingError,
};

pub use process::{FnRunner, ProcessRunner, ToolCommand, ToolEnv, ToolOutput, ToolRunner};
