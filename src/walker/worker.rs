//! Worker thread logic for the parallel enumeration
//!
//! Each worker loops:
//! - Pop a directory work item from the shared frontier
//! - List its children through the Lister capability
//! - Push subdirectories back onto the frontier
//! - Emit matching entries into the result channel
//!
//! Workers retire when the frontier is provably drained or cancellation is
//! observed. The last worker to retire records the session outcome; the
//! result channel closes when the last worker's sender drops.

use crate::cancel::CancellationToken;
use crate::config::ResultFilter;
use crate::error::{ExpandOutcome, WorkerError};
use crate::fs::types::Entry;
use crate::fs::Lister;
use crate::walker::dedup::DedupGuard;
use crate::walker::frontier::{Frontier, Pop, TaskGuard, WorkItem};
use crate::walker::stream::ScanOutcome;
use crossbeam_channel::Sender;
use globset::GlobMatcher;
use regex::Regex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How long a worker waits for new frontier work before re-checking
/// cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Statistics shared by all workers in one session
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Directories expanded
    pub dirs_expanded: AtomicU64,

    /// Directories skipped (depth bound, exclusion, dedup)
    pub dirs_skipped: AtomicU64,

    /// Directories the lister reported unavailable
    pub dirs_failed: AtomicU64,

    /// Duplicate expansions suppressed by the dedup guard
    pub dedup_hits: AtomicU64,

    /// Files seen (whether or not emitted)
    pub files_seen: AtomicU64,

    /// Bytes seen (sum of file sizes)
    pub bytes_seen: AtomicU64,

    /// Entries emitted into the result channel
    pub entries_emitted: AtomicU64,
}

impl ScanStats {
    fn record_expanded(&self) {
        self.dirs_expanded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_skipped(&self) {
        self.dirs_skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failed(&self) {
        self.dirs_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dedup_hit(&self) {
        self.dedup_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_file(&self, bytes: u64) {
        self.files_seen.fetch_add(1, Ordering::Relaxed);
        self.bytes_seen.fetch_add(bytes, Ordering::Relaxed);
    }

    fn record_emitted(&self) {
        self.entries_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Directories expanded so far
    pub fn expanded_count(&self) -> u64 {
        self.dirs_expanded.load(Ordering::Relaxed)
    }

    /// Directories the lister reported unavailable so far
    pub fn failed_count(&self) -> u64 {
        self.dirs_failed.load(Ordering::Relaxed)
    }

    /// Duplicate expansions suppressed so far
    pub fn dedup_hit_count(&self) -> u64 {
        self.dedup_hits.load(Ordering::Relaxed)
    }

    /// Entries emitted so far
    pub fn emitted_count(&self) -> u64 {
        self.entries_emitted.load(Ordering::Relaxed)
    }

    /// Bytes seen so far
    pub fn bytes_seen_count(&self) -> u64 {
        self.bytes_seen.load(Ordering::Relaxed)
    }
}

/// Everything a worker shares with its peers
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub(crate) filter: ResultFilter,
    pub(crate) max_depth: Option<u32>,
    pub(crate) matcher: GlobMatcher,
    pub(crate) excludes: Arc<Vec<Regex>>,
    pub(crate) ignore_names: Arc<HashSet<String>>,
    pub(crate) lister: Arc<dyn Lister>,
    pub(crate) frontier: Arc<Frontier>,
    pub(crate) dedup: Arc<DedupGuard>,
    pub(crate) results: Sender<Entry>,
    pub(crate) cancel: CancellationToken,
    pub(crate) stats: Arc<ScanStats>,
    pub(crate) outcome: Arc<OnceLock<ScanOutcome>>,
    pub(crate) active: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn is_excluded(&self, path: &std::path::Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        let text = path.to_string_lossy();
        self.excludes.iter().any(|re| re.is_match(&text))
    }

    fn name_matches(&self, name: &str) -> bool {
        self.matcher.is_match(name)
    }
}

/// A worker thread that expands directory work items
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn a new worker thread
    pub(crate) fn spawn(id: usize, ctx: WorkerContext) -> Result<Self, WorkerError> {
        let handle = thread::Builder::new()
            .name(format!("scan-{}", id))
            .spawn(move || worker_loop(id, ctx))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WorkerError::Panicked { id: self.id }),
            None => Ok(()),
        }
    }
}

/// Main worker loop
fn worker_loop(id: usize, ctx: WorkerContext) {
    debug!(worker = id, "worker starting");

    loop {
        // Cancellation abandons the frontier rather than draining it.
        if ctx.cancel.is_cancelled() {
            ctx.frontier.close();
            break;
        }

        match ctx.frontier.next(POLL_INTERVAL) {
            Pop::Closed => break,
            Pop::Empty => continue,
            Pop::Item(item) => {
                let _task = TaskGuard::new(&ctx.frontier);
                let outcome = expand_directory(&item, &ctx);

                match &outcome {
                    ExpandOutcome::Expanded {
                        path,
                        emitted,
                        subdirs,
                    } => {
                        trace!(worker = id, path = %path.display(), emitted, subdirs, "directory expanded");
                    }
                    ExpandOutcome::Skipped { path, reason } => {
                        debug!(worker = id, path = %path.display(), reason, "directory skipped");
                    }
                    ExpandOutcome::Failed { path, error } => {
                        warn!(worker = id, path = %path.display(), error = %error, "directory unavailable");
                    }
                }
            }
        }
    }

    // The worker driving the active count to zero records the session
    // outcome before its result sender drops; the channel closes when the
    // last sender is gone, and never before.
    let previous = ctx.active.fetch_sub(1, Ordering::AcqRel);
    if previous == 1 {
        let outcome = if ctx.cancel.is_cancelled() {
            ScanOutcome::Cancelled
        } else {
            ScanOutcome::Completed
        };
        let _ = ctx.outcome.set(outcome);
        debug!(worker = id, ?outcome, "last worker retired, closing result channel");
    }

    debug!(
        worker = id,
        dirs = ctx.stats.expanded_count(),
        emitted = ctx.stats.emitted_count(),
        "worker retired"
    );
}

/// Self/parent pseudo-entries some listers report
fn is_pseudo_name(name: &str) -> bool {
    matches!(name, "." | "..")
}

/// Expand a single directory work item
fn expand_directory(item: &WorkItem, ctx: &WorkerContext) -> ExpandOutcome {
    // Defensive depth check; pushes are already bound-filtered.
    if let Some(limit) = ctx.max_depth {
        if item.depth > limit {
            ctx.stats.record_skipped();
            return ExpandOutcome::Skipped {
                path: item.path.clone(),
                reason: "beyond depth bound",
            };
        }
    }

    if ctx.is_excluded(&item.path) {
        ctx.stats.record_skipped();
        return ExpandOutcome::Skipped {
            path: item.path.clone(),
            reason: "matched exclude pattern",
        };
    }

    // Claim-or-skip: a path reachable through two pending work items is
    // expanded exactly once per session.
    if !ctx.dedup.claim(&item.path) {
        ctx.stats.record_dedup_hit();
        ctx.stats.record_skipped();
        return ExpandOutcome::Skipped {
            path: item.path.clone(),
            reason: "already expanded",
        };
    }

    let children = match ctx.lister.list(&item.path, &ctx.cancel) {
        Ok(children) => children,
        Err(error) => {
            ctx.stats.record_failed();
            return ExpandOutcome::Failed {
                path: item.path.clone(),
                error,
            };
        }
    };

    ctx.stats.record_expanded();

    let mut emitted = 0usize;
    let mut subdirs = 0usize;

    for record in children {
        if ctx.cancel.is_cancelled() {
            break;
        }
        if is_pseudo_name(&record.name) || ctx.ignore_names.contains(&record.name) {
            continue;
        }

        let entry = Entry::from_record(record, &item.path, item.depth);

        if entry.is_directory {
            subdirs += 1;

            let next_depth = item.depth + 1;
            let within_bound = ctx.max_depth.map_or(true, |limit| next_depth <= limit);
            if within_bound && !ctx.is_excluded(&entry.full_path) {
                ctx.frontier
                    .push(WorkItem::new(entry.full_path.clone(), next_depth));
            }

            if ctx.filter.wants_directories() && ctx.name_matches(&entry.name) {
                if emit(ctx, entry).is_err() {
                    break;
                }
                emitted += 1;
            }
        } else {
            ctx.stats.record_file(entry.size);

            if ctx.filter.wants_files() && ctx.name_matches(&entry.name) {
                if emit(ctx, entry).is_err() {
                    break;
                }
                emitted += 1;
            }
        }
    }

    ExpandOutcome::Expanded {
        path: item.path.clone(),
        emitted,
        subdirs,
    }
}

/// Push one entry into the result channel
///
/// Blocks when the channel is capacity-bounded and full (backpressure). A
/// send failure means the consumer dropped the stream; that is treated as
/// cancellation so the whole pool winds down.
fn emit(ctx: &WorkerContext, entry: Entry) -> Result<(), ()> {
    match ctx.results.send(entry) {
        Ok(()) => {
            ctx.stats.record_emitted();
            Ok(())
        }
        Err(_) => {
            ctx.cancel.cancel();
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_stats() {
        let stats = ScanStats::default();

        stats.record_expanded();
        stats.record_file(1024);
        stats.record_file(512);
        stats.record_emitted();
        stats.record_failed();
        stats.record_skipped();
        stats.record_dedup_hit();

        assert_eq!(stats.expanded_count(), 1);
        assert_eq!(stats.files_seen.load(Ordering::Relaxed), 2);
        assert_eq!(stats.bytes_seen_count(), 1536);
        assert_eq!(stats.emitted_count(), 1);
        assert_eq!(stats.failed_count(), 1);
        assert_eq!(stats.dirs_skipped.load(Ordering::Relaxed), 1);
        assert_eq!(stats.dedup_hit_count(), 1);
    }

    #[test]
    fn test_pseudo_names() {
        assert!(is_pseudo_name("."));
        assert!(is_pseudo_name(".."));
        assert!(!is_pseudo_name("..."));
        assert!(!is_pseudo_name("a.txt"));
    }
}
