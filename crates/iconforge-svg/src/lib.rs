//! # IconForge SVG
//!
//! Structured SVG handling shared by both fabrication pipelines:
//! - [`document`]: element tree read and written through quick-xml
//! - [`normalize`]: icon canonicalization (colors, strokes, relative sizes)
//! - [`path_data`]: `d` attribute parsing into lyon curve segments

pub mod document;
pub mod error;
pub mod normalize;
pub mod path_data;

pub use document::{CanvasMeta, Element, Node, SvgDocument, SVG_NAMESPACE};
pub use error::{SvgError, SvgResult};
pub use normalize::{normalize_document, normalize_icon};
pub use path_data::{PathData, Segment, Subpath};
