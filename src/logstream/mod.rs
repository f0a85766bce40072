//! Live device log stream.
//!
//! Frames from `/wsserial` are decoded by [`crate::ansi`] and kept in a
//! bounded [`LogStreamView`].

mod client;
mod error;
mod view;

pub use client::{stream_url, ConnectionState, LogStreamClient};
pub use error::LogStreamError;
pub use view::{LogStreamView, DEFAULT_LOG_CAPACITY};

pub use crate::ansi::LineRecord;
