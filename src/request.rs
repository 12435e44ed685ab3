//! Request surface
//!
//! Requests are validated before any stage runs, so a bad parameter never
//! costs a download or a tool invocation.

use iconforge_core::{FetchError, ParameterError};
use iconforge_solid::{HoleOrientation, SolidOptions};
use std::fmt;
use std::path::PathBuf;

/// Where the icon markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Downloaded over http or https
    Url(String),
    /// Read from the local filesystem
    File(PathBuf),
}

impl IconSource {
    /// Interpret a command-line argument; anything with a scheme is a URL
    pub fn parse(source: &str) -> Self {
        if source.contains("://") {
            IconSource::Url(source.to_string())
        } else {
            IconSource::File(PathBuf::from(source))
        }
    }

    /// Reject URLs that are not http or https
    pub fn validate(&self) -> Result<(), FetchError> {
        match self {
            IconSource::Url(url) => {
                let lower = url.trim().to_ascii_lowercase();
                if lower.starts_with("http://") || lower.starts_with("https://") {
                    Ok(())
                } else {
                    Err(FetchError::UnsupportedScheme { url: url.clone() })
                }
            }
            IconSource::File(_) => Ok(()),
        }
    }
}

impl fmt::Display for IconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconSource::Url(url) => f.write_str(url),
            IconSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Multi-path SVG request
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPathRequest {
    pub source: IconSource,
}

impl MultiPathRequest {
    pub fn new(source: IconSource) -> Self {
        Self { source }
    }

    pub fn validate(&self) -> iconforge_core::Result<()> {
        self.source.validate()?;
        Ok(())
    }
}

/// Solid (STL) request
#[derive(Debug, Clone, PartialEq)]
pub struct SolidRequest {
    pub source: IconSource,
    pub options: SolidOptions,
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ParameterError> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Validate solid options against their accepted ranges
pub fn validate_options(options: &SolidOptions) -> Result<(), ParameterError> {
    check_range("size", options.size, 0.0, 10000.0)?;
    check_range("thickness", options.thickness, 0.01, 1000.0)?;
    check_range("base_thickness", options.base_thickness, 0.0, 1000.0)?;
    check_range("base_offset", options.base_offset, 0.0, 1000.0)?;
    check_range("hole_diameter", options.hole_diameter, 0.0, 100.0)?;
    check_range("flat_top_offset", options.flat_top_offset, 0.1, 10.0)?;
    Ok(())
}

impl SolidRequest {
    pub fn new(source: IconSource) -> Self {
        Self {
            source,
            options: SolidOptions::default(),
        }
    }

    /// Parse and set the hole orientation (case-insensitive)
    pub fn with_orientation(mut self, orientation: &str) -> Result<Self, ParameterError> {
        self.options.hole_orientation = orientation.parse::<HoleOrientation>()?;
        Ok(self)
    }

    pub fn validate(&self) -> iconforge_core::Result<()> {
        self.source.validate()?;
        validate_options(&self.options)?;
        Ok(())
    }
}
