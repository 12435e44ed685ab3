//! Settings errors: unreadable files, unknown formats and values that fail
//! validation.

use std::io;
use thiserror::Error;

/// Settings load/save/validate error type
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A value is outside what the pipelines accept
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Only `.json` and `.toml` files are understood
    #[error("Config file must be .json or .toml: {0}")]
    UnsupportedFormat(String),

    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed TOML
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),
}

impl SettingsError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
