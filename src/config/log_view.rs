//! Log view configuration

use serde::{Deserialize, Serialize};

use crate::logstream::DEFAULT_LOG_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogViewConfig {
    /// Maximum number of lines kept
    pub capacity: usize,
    /// Follow new lines as they arrive
    pub autoscroll: bool,
}

impl Default for LogViewConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LOG_CAPACITY,
            autoscroll: true,
        }
    }
}
