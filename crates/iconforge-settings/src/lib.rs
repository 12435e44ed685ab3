//! # IconForge Settings
//!
//! Configuration management for the IconForge pipelines: external tool
//! invocation settings, segmentation constants and geometry resolution.

pub mod config;
pub mod error;

pub use config::{
    Config, FetchSettings, GeometrySettings, ModelerSettings, RasterizerSettings,
    SegmentationSettings, TracerSettings,
};
pub use error::{SettingsError, SettingsResult};
