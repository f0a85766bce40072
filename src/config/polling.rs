//! Polling intervals

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timer settings for the status monitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Period of the firmware-update status poll
    pub upgrade_interval_ms: u64,
    /// Delay before re-reading a WiFi scan that is still running
    pub scan_reschedule_ms: u64,
}

impl PollingConfig {
    pub fn upgrade_interval(&self) -> Duration {
        Duration::from_millis(self.upgrade_interval_ms)
    }

    pub fn scan_reschedule(&self) -> Duration {
        Duration::from_millis(self.scan_reschedule_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            upgrade_interval_ms: 2000,
            scan_reschedule_ms: 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_config_defaults() {
        let config = PollingConfig::default();
        assert_eq!(config.upgrade_interval(), Duration::from_millis(2000));
        assert_eq!(config.scan_reschedule(), Duration::from_millis(1200));
    }

    #[test]
    fn test_polling_config_partial_toml() {
        let config: PollingConfig = toml::from_str("scan_reschedule_ms = 500").unwrap();
        assert_eq!(config.scan_reschedule_ms, 500);
        assert_eq!(config.upgrade_interval_ms, 2000);
    }
}
