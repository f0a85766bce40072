//! Error types for device requests.

use thiserror::Error;

/// Errors that can occur while talking to the device.
///
/// `Timeout`, `Connection` and `Http` are transport failures; `Rejected` and
/// `Malformed` are envelope failures (the device answered, but not with a
/// usable `{"ok": true, ...}` body).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Device unreachable
    #[error("connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Envelope carried `ok != true`
    #[error("request rejected by device: {0}")]
    Rejected(String),

    /// Body missing or not shaped as expected
    #[error("invalid response: {0}")]
    Malformed(String),
}

impl DeviceError {
    /// Whether the device could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DeviceError::Timeout(_) | DeviceError::Connection(_) | DeviceError::Http(_)
        )
    }
}
