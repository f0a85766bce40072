//! "Load once" latch for page sections.

use std::sync::atomic::{AtomicBool, Ordering};

/// Guards the initial fetch of a resource.
///
/// Only the first [`LoadLatch::try_claim`] succeeds. It does not prevent
/// later refreshes, only duplicate initial loads.
#[derive(Debug, Default)]
pub struct LoadLatch {
    loaded: AtomicBool,
}

impl LoadLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test-and-set: returns `true` exactly once.
    pub fn try_claim(&self) -> bool {
        !self.loaded.swap(true, Ordering::AcqRel)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Re-open the latch (full reload of the page state).
    pub fn reset(&self) {
        self.loaded.store(false, Ordering::Release);
    }
}
