//! `[logging]` section

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::ConfigError;

/// Levels accepted for `level` and per-component overrides.
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Crate modules that can get their own level.
pub const LOG_COMPONENTS: [&str; 14] = [
    "ansi", "cli", "config", "device", "flowcfg", "logging", "logstream", "mqtt", "polling",
    "session", "status", "system", "upgrade", "wifi",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines on stderr
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Diagnostics settings. Events go to stderr; stdout carries command output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Per-module overrides, e.g. `polling = "debug"`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            component_levels: BTreeMap::new(),
        }
    }
}

fn is_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_level(&self.level) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("'{}' is not one of {}", self.level, LOG_LEVELS.join(", ")),
            ));
        }
        for (component, level) in &self.component_levels {
            let field = format!("logging.component_levels.{}", component);
            if !LOG_COMPONENTS.contains(&component.as_str()) {
                return Err(ConfigError::invalid(field, "unknown component"));
            }
            if !is_level(level) {
                return Err(ConfigError::invalid(field, format!("'{}' is not a log level", level)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.component_levels.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_component_levels_from_toml() {
        let config: LoggingConfig = toml::from_str(
            r#"
            level = "info"
            [component_levels]
            polling = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.component_levels.get("polling").map(String::as_str), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "logging.level"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_component() {
        let mut config = LoggingConfig::default();
        config
            .component_levels
            .insert("router".to_string(), "debug".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. })
                if field == "logging.component_levels.router"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_component_level() {
        let mut config = LoggingConfig::default();
        config
            .component_levels
            .insert("wifi".to_string(), "loud".to_string());
        assert!(config.validate().is_err());
    }
}
