//! Cooperative cancellation for the super-linear analyses.
//!
//! The co-location matrix and the pairwise spacing computation are the only
//! operations whose cost grows faster than the point count. Interactive
//! callers hand them a [`CancelToken`] and flip it from another thread to
//! bound latency; a cancelled computation returns
//! [`EngineError::Cancelled`](crate::EngineError::Cancelled) instead of a
//! silently truncated result.

use crate::error::{EngineError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag, cheap to clone across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Bail out of a computation if cancellation was requested.
    ///
    /// Analyses call this at every outer iteration and propagate with `?`.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            log::debug!("analysis observed cancellation");
            Err(EngineError::Cancelled)
        } else {
            Ok(())
        }
    }
}
