//! Device connection configuration

use serde::{Deserialize, Serialize};

/// Where the supervisor lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// HTTP base URL of the supervisor web interface
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Websocket path of the serial log stream
    pub log_stream_path: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1".to_string(),
            timeout_seconds: 5,
            log_stream_path: "/wsserial".to_string(),
        }
    }
}
