//! Error types for the log stream connection.

use thiserror::Error;

/// Errors raised while opening or writing to the log stream.
#[derive(Debug, Clone, Error)]
pub enum LogStreamError {
    /// The device URL cannot be turned into a websocket URL
    #[error("invalid log stream URL: {0}")]
    InvalidUrl(String),

    /// Websocket handshake failed
    #[error("log stream connection failed: {0}")]
    Connect(String),

    /// Writing a console line failed
    #[error("failed to send console line: {0}")]
    Send(String),

    #[error("log stream is not connected")]
    NotConnected,
}
