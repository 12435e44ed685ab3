//! Error types for SVG document handling.

use thiserror::Error;

/// Errors raised while reading SVG markup or path data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgError {
    /// The markup is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// The markup contains no element at all.
    #[error("Document has no root element")]
    MissingRoot,

    /// The root element is not `<svg>`.
    #[error("Root element is <{0}>, expected <svg>")]
    NotSvgRoot(String),

    /// Path data could not be parsed.
    #[error("Invalid path data at offset {offset}: {reason}")]
    PathData { offset: usize, reason: String },
}

/// Result type alias for SVG operations.
pub type SvgResult<T> = Result<T, SvgError>;
