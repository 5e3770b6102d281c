//! Lazily consumed result stream
//!
//! The stream is the consumer's half of the result channel. It yields
//! entries as workers discover them and ends in exactly one of two ways:
//! a clean close (the namespace was fully traversed) or a cancelled close
//! (the caller requested an early stop). [`EntryStream::outcome`] tells
//! them apart after the stream is exhausted.

use crate::cancel::CancellationToken;
use crate::fs::types::Entry;
use crate::walker::worker::{ScanStats, Worker};
use crossbeam_channel::Receiver;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every reachable directory within the bound was expanded
    Completed,

    /// Cancellation truncated the traversal
    Cancelled,
}

/// Lazy sequence of discovered entries
///
/// Returned immediately by [`Scanner::start`]; the traversal runs
/// concurrently while the stream is drained. Dropping the stream cancels
/// the session and joins the worker pool.
///
/// [`Scanner::start`]: crate::Scanner::start
pub struct EntryStream {
    receiver: Option<Receiver<Entry>>,
    cancel: CancellationToken,
    outcome: Arc<OnceLock<ScanOutcome>>,
    stats: Arc<ScanStats>,
    workers: Vec<Worker>,
    finished: bool,
}

impl EntryStream {
    pub(crate) fn new(
        receiver: Receiver<Entry>,
        cancel: CancellationToken,
        outcome: Arc<OnceLock<ScanOutcome>>,
        stats: Arc<ScanStats>,
        workers: Vec<Worker>,
    ) -> Self {
        Self {
            receiver: Some(receiver),
            cancel,
            outcome,
            stats,
            workers,
            finished: false,
        }
    }

    /// Request cooperative cancellation of the session
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the session's cancellation token
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// How the session ended; `None` while it is still running
    pub fn outcome(&self) -> Option<ScanOutcome> {
        self.outcome.get().copied()
    }

    /// True once the session ended due to cancellation
    pub fn was_cancelled(&self) -> bool {
        self.outcome() == Some(ScanOutcome::Cancelled)
    }

    /// Live statistics for the session
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Cancellation observed by the consumer: abandon buffered entries,
    /// unblock any producer stuck on a bounded send, and join the pool.
    fn finish_cancelled(&mut self) {
        self.finished = true;
        let _ = self.outcome.set(ScanOutcome::Cancelled);
        self.receiver = None;
        self.join_workers();
    }

    fn finish_closed(&mut self) {
        self.finished = true;
        self.receiver = None;
        self.join_workers();
    }

    fn join_workers(&mut self) {
        for worker in self.workers.drain(..) {
            let id = worker.id();
            if let Err(e) = worker.join() {
                warn!(worker = id, error = %e, "worker failed to join cleanly");
            }
        }
    }
}

impl Iterator for EntryStream {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        if self.finished {
            return None;
        }

        // Surface cancellation on the next drain attempt, even if entries
        // are still buffered in the channel.
        if self.cancel.is_cancelled() {
            self.finish_cancelled();
            return None;
        }

        let receiver = self.receiver.as_ref()?;
        match receiver.recv() {
            Ok(entry) => Some(entry),
            Err(_) => {
                // Every sender dropped: the last worker retired and recorded
                // the outcome before closing the channel.
                self.finish_closed();
                None
            }
        }
    }
}

impl Drop for EntryStream {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel.cancel();
            self.receiver = None;
            self.join_workers();
            let _ = self.outcome.set(ScanOutcome::Cancelled);
        }
    }
}
