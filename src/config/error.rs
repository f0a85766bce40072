//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating `flowio.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file not found: {0} (create one with `flowio config init`)")]
    NotFound(PathBuf),

    #[error("Invalid TOML in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// `field` is the dotted TOML key, e.g. `device.base_url`.
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
