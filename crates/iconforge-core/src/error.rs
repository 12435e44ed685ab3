//! Error handling for IconForge
//!
//! Provides the error taxonomy for every pipeline stage:
//! - Fetch errors (unreachable or invalid icon source)
//! - Rasterize errors (rasterizer exhausted its retries)
//! - Segmentation errors (undecodable raster, no shapes found)
//! - Tracing errors (tracer failures)
//! - Geometry errors (no parsable path, degenerate polygon)
//! - Solid model errors (modeler failures, undersized output)
//!
//! Every stage fails fast. The unified [`Error`] classifies itself into an
//! [`ErrorClass`] so request surfaces can tell client mistakes, processing
//! failures and geometry validation failures apart.

use thiserror::Error;

/// Icon source error type
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Only http and https URLs are accepted
    #[error("url must be http or https: {url}")]
    UnsupportedScheme {
        /// The rejected URL.
        url: String,
    },

    /// The remote icon could not be downloaded
    #[error("Failed to fetch SVG from {url}: {reason}")]
    Unreachable {
        /// The URL that failed.
        url: String,
        /// The reason reported by the fetcher.
        reason: String,
    },

    /// A local icon file could not be read
    #[error("Failed to read icon file {path}: {reason}")]
    ReadFailed {
        /// The file path.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// The fetched content is not usable SVG markup
    #[error("Fetched document is not an SVG: {reason}")]
    NotSvg {
        /// Why the markup was rejected.
        reason: String,
    },
}

/// Rasterizer error type
#[derive(Error, Debug, Clone)]
pub enum RasterizeError {
    /// Every attempt exited with a failure status
    #[error("Inkscape failed after {attempts} attempts: {detail}")]
    Failed {
        /// Number of attempts made.
        attempts: u32,
        /// Diagnostics of the last attempt.
        detail: String,
    },

    /// Every attempt produced an empty or near-blank raster
    #[error("Inkscape produced blank output after {attempts} attempts ({bytes} bytes)")]
    BlankOutput {
        /// Number of attempts made.
        attempts: u32,
        /// Byte size of the last attempt's output.
        bytes: usize,
    },
}

/// Raster segmentation error type
#[derive(Error, Debug, Clone)]
pub enum SegmentationError {
    /// The raster could not be decoded
    #[error("Failed to load image: {reason}")]
    Decode {
        /// The decoder's message.
        reason: String,
    },

    /// No component survived the noise floor
    #[error(
        "No shapes found in image (raster was {raster_bytes} bytes). \
         The SVG may use currentColor or have no visible strokes/fills."
    )]
    NoShapes {
        /// Size of the rasterized input in bytes.
        raster_bytes: usize,
    },
}

/// Tracer error type
#[derive(Error, Debug, Clone)]
pub enum TracingError {
    /// The tracer exited with a failure status
    #[error("Potrace failed on component {component}: {detail}")]
    Failed {
        /// The shape component label.
        component: u32,
        /// Tracer diagnostics.
        detail: String,
    },

    /// A component mask could not be encoded for the tracer
    #[error("Failed to encode mask for component {component}: {reason}")]
    MaskEncoding {
        /// The shape component label.
        component: u32,
        /// The encoder's message.
        reason: String,
    },

    /// The tracer output is not readable SVG
    #[error("Potrace produced unreadable SVG for component {component}: {reason}")]
    InvalidOutput {
        /// The shape component label.
        component: u32,
        /// The parser's message.
        reason: String,
    },
}

/// Geometry construction error type
///
/// Surfaced to callers as a semantic validation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The document has no path with data
    #[error("No path in main SVG to derive base from")]
    NoPath,

    /// The path data could not be turned into a polygon
    #[error("Could not parse main path as polygon")]
    UnparsablePath,

    /// The polygon collapsed even after the offset fallback
    #[error("Could not build base path: {reason}")]
    Degenerate {
        /// What collapsed.
        reason: String,
    },
}

/// Solid modeler error type
#[derive(Error, Debug, Clone)]
pub enum SolidModelError {
    /// The modeler exited with a failure status
    #[error("OpenSCAD failed (exit {exit_code}): {detail}")]
    Failed {
        /// Exit code, or -1 when terminated by a signal.
        exit_code: i32,
        /// Modeler diagnostics.
        detail: String,
    },

    /// The modeler output is missing or implausibly small
    #[error("OpenSCAD did not produce a valid STL ({bytes} bytes): {detail}")]
    InvalidOutput {
        /// Size of the output file in bytes (0 when missing).
        bytes: u64,
        /// Modeler diagnostics.
        detail: String,
    },
}

/// Request parameter validation error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

/// External tool invocation error type
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    /// The tool could not be started
    #[error("Failed to start {program}: {reason}")]
    Spawn {
        /// Program name.
        program: String,
        /// The OS error.
        reason: String,
    },

    /// The tool ran past its time budget and was killed
    #[error("{program} timed out after {timeout_ms}ms")]
    Timeout {
        /// Program name.
        program: String,
        /// The timeout in milliseconds.
        timeout_ms: u64,
    },

    /// Reading the tool's output failed
    #[error("I/O error while running {program}: {reason}")]
    Io {
        /// Program name.
        program: String,
        /// The I/O failure.
        reason: String,
    },
}

/// Coarse classification of failures for request surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad parameters or an unusable icon source
    ClientInput,
    /// A pipeline stage or external tool failed
    Processing,
    /// The icon geometry cannot be turned into a solid
    GeometryValidation,
}

impl ErrorClass {
    /// HTTP-style status code for this class
    pub fn status_code(self) -> u16 {
        match self {
            Self::ClientInput => 400,
            Self::Processing => 500,
            Self::GeometryValidation => 422,
        }
    }

    /// Process exit code for this class
    pub fn exit_code(self) -> i32 {
        match self {
            Self::ClientInput => 2,
            Self::Processing => 1,
            Self::GeometryValidation => 3,
        }
    }
}

/// Main error type for IconForge
#[derive(Error, Debug)]
pub enum Error {
    /// Icon source error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Rasterizer error
    #[error(transparent)]
    Rasterize(#[from] RasterizeError),

    /// Segmentation error
    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    /// Tracer error
    #[error(transparent)]
    Tracing(#[from] TracingError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Solid modeler error
    #[error(transparent)]
    SolidModel(#[from] SolidModelError),

    /// Invalid request parameter
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// External tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error for the request surface
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Fetch(_) | Error::Parameter(_) => ErrorClass::ClientInput,
            Error::Geometry(_) => ErrorClass::GeometryValidation,
            _ => ErrorClass::Processing,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
