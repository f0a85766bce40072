//! Configuration module for the Flow.IO console
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FLOWIO_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use flowio::config::ConsoleConfig;
//!
//! let config = ConsoleConfig::default();
//! assert_eq!(config.polling.upgrade_interval_ms, 2000);
//!
//! let toml = r#"
//! [device]
//! base_url = "http://flowio.local"
//! "#;
//! let config: ConsoleConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.device.base_url, "http://flowio.local");
//! ```

pub mod device;
pub mod error;
pub mod log_view;
pub mod logging;
pub mod polling;

pub use device::DeviceConfig;
pub use error::ConfigError;
pub use log_view::LogViewConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the console.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Supervisor connection
    pub device: DeviceConfig,
    /// Status monitor timers
    pub polling: PollingConfig,
    /// Log history settings
    pub log_view: LogViewConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.message().to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("FLOWIO_URL") {
            if !url.trim().is_empty() {
                self.device.base_url = url;
            }
        }
        if let Ok(timeout) = std::env::var("FLOWIO_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.device.timeout_seconds = t;
            }
        }
        if let Ok(level) = std::env::var("FLOWIO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLOWIO_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match url::Url::parse(&self.device.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::invalid(
                    "device.base_url",
                    format!("'{}' is not an http(s) URL", self.device.base_url),
                ))
            }
        }

        if self.device.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "device.timeout_seconds",
                "timeout must be non-zero",
            ));
        }
        if self.polling.upgrade_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "polling.upgrade_interval_ms",
                "interval must be non-zero",
            ));
        }
        if self.polling.scan_reschedule_ms == 0 {
            return Err(ConfigError::invalid(
                "polling.scan_reschedule_ms",
                "interval must be non-zero",
            ));
        }
        if self.log_view.capacity == 0 {
            return Err(ConfigError::invalid(
                "log_view.capacity",
                "capacity must be non-zero",
            ));
        }

        self.logging.validate()
    }
}
