//! Configuration for IconForge
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files; the default location is the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - External tools (rasterizer, tracer, modeler, fetcher)
//! - Raster segmentation constants
//! - Geometry sampling resolution

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rasterizer (Inkscape) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerSettings {
    /// Program name or path
    pub program: String,
    /// Export resolution
    pub dpi: u32,
    /// Background color of the exported raster
    pub background: String,
    /// Crop the export to the drawing's bounding box
    pub crop_to_drawing: bool,
    /// Attempts before giving up
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    pub retry_backoff_ms: u64,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// Outputs smaller than this are treated as blank
    pub min_output_bytes: usize,
}

impl Default for RasterizerSettings {
    fn default() -> Self {
        Self {
            program: "inkscape".to_string(),
            dpi: 1200,
            background: "white".to_string(),
            crop_to_drawing: true,
            max_attempts: 3,
            retry_backoff_ms: 500,
            timeout_secs: 60,
            min_output_bytes: 500,
        }
    }
}

/// Tracer (Potrace) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerSettings {
    pub program: String,
    /// Luminance threshold
    pub blacklevel: f64,
    /// Minimum feature size in pixels
    pub turdsize: u32,
    /// Corner smoothness
    pub alphamax: f64,
    /// Curve optimization tolerance
    pub opttolerance: f64,
    pub timeout_secs: u64,
}

impl Default for TracerSettings {
    fn default() -> Self {
        Self {
            program: "potrace".to_string(),
            blacklevel: 0.5,
            turdsize: 10,
            alphamax: 1.334,
            opttolerance: 0.1,
            timeout_secs: 30,
        }
    }
}

/// Solid modeler (OpenSCAD) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelerSettings {
    pub program: String,
    pub timeout_secs: u64,
    /// Outputs smaller than this are rejected
    pub min_output_bytes: u64,
}

impl Default for ModelerSettings {
    fn default() -> Self {
        Self {
            program: "openscad".to_string(),
            timeout_secs: 120,
            min_output_bytes: 100,
        }
    }
}

/// Icon download settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub program: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            program: "curl".to_string(),
            user_agent: "clicker-designer/1.0".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Raster segmentation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSettings {
    /// Integer upscaling factor
    pub upscale: u32,
    /// White border added on every side, in pixels
    pub padding: u32,
    /// Luminance cutoff; pixels above it are background
    pub threshold: u8,
    /// Components with fewer foreground pixels are noise
    pub noise_floor: usize,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            upscale: 3,
            padding: 80,
            threshold: 60,
            noise_floor: 50,
        }
    }
}

/// Geometry sampling resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Samples per path for bounding-box ranking
    pub coarse_samples: usize,
    /// Samples per path for geometry construction
    pub fine_samples: usize,
    /// Segments per quarter turn when flattening offset arcs
    pub arc_segments_per_quadrant: usize,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            coarse_samples: 64,
            fine_samples: 256,
            arc_segments_per_quadrant: 64,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub rasterizer: RasterizerSettings,
    pub tracer: TracerSettings,
    pub modeler: ModelerSettings,
    pub fetch: FetchSettings,
    pub segmentation: SegmentationSettings,
    pub geometry: GeometrySettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location (`<config dir>/iconforge/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("iconforge").join("config.toml"))
    }

    /// Load the explicit file, else the default file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load_from_file(&default),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(SettingsError::UnsupportedFormat(
                path.display().to_string(),
            ));
        };

        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(SettingsError::UnsupportedFormat(
                path.display().to_string(),
            ));
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        for (key, program) in [
            ("rasterizer.program", &self.rasterizer.program),
            ("tracer.program", &self.tracer.program),
            ("modeler.program", &self.modeler.program),
            ("fetch.program", &self.fetch.program),
        ] {
            if program.trim().is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
        }

        if self.rasterizer.dpi == 0 {
            return Err(SettingsError::invalid("rasterizer.dpi", "must be > 0"));
        }
        if self.rasterizer.max_attempts == 0 {
            return Err(SettingsError::invalid(
                "rasterizer.max_attempts",
                "must be > 0",
            ));
        }
        for (key, secs) in [
            ("rasterizer.timeout_secs", self.rasterizer.timeout_secs),
            ("tracer.timeout_secs", self.tracer.timeout_secs),
            ("modeler.timeout_secs", self.modeler.timeout_secs),
            ("fetch.timeout_secs", self.fetch.timeout_secs),
        ] {
            if secs == 0 {
                return Err(SettingsError::invalid(key, "must be > 0"));
            }
        }

        if !(0.0..=1.0).contains(&self.tracer.blacklevel) {
            return Err(SettingsError::invalid(
                "tracer.blacklevel",
                "must be between 0 and 1",
            ));
        }

        if self.segmentation.upscale == 0 {
            return Err(SettingsError::invalid("segmentation.upscale", "must be > 0"));
        }

        if self.geometry.coarse_samples < 4 || self.geometry.fine_samples < 4 {
            return Err(SettingsError::invalid(
                "geometry",
                "sample counts must be at least 4",
            ));
        }
        if self.geometry.arc_segments_per_quadrant == 0 {
            return Err(SettingsError::invalid(
                "geometry.arc_segments_per_quadrant",
                "must be > 0",
            ));
        }

        Ok(())
    }
}
