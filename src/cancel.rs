//! Cooperative cancellation
//!
//! A cheap, cloneable flag checked by every worker at the top of each
//! iteration, inside the dispatch loop, and inside listers where feasible.
//! Cancellation truncates the stream; it is not an error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cooperative cancellation handle
///
/// Clones observe the same underlying flag. Once cancelled, a token stays
/// cancelled for the lifetime of the session.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
