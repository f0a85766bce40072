//! Flow.IO console - client for the Flow.IO pool controller supervisor
//!
//! This library drives the supervisor's web interface: it decodes the
//! colored serial log stream, tracks firmware updates and WiFi scans with
//! self-rescheduling monitors, and browses and edits the hierarchical
//! configuration tree of the Flow.IO board.

pub mod ansi;
pub mod cli;
pub mod config;
pub mod device;
pub mod flowcfg;
pub mod logging;
pub mod logstream;
pub mod mqtt;
pub mod polling;
pub mod session;
pub mod status;
pub mod system;
pub mod upgrade;
pub mod wifi;
