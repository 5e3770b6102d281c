//! Scan coordinator - sets up and launches one enumeration session
//!
//! The coordinator is responsible for:
//! - Validating the configuration before any worker starts
//! - Compiling the name pattern and exclude regexes
//! - Seeding the frontier with the root work item
//! - Spawning the worker pool and handing the caller an [`EntryStream`]
//!
//! A session is single-use: construct, start, drain, discard.

use crate::cancel::CancellationToken;
use crate::config::{ScanConfig, MAX_WORKERS};
use crate::error::{ConfigError, Result};
use crate::fs::{Lister, OsLister};
use crate::walker::dedup::DedupGuard;
use crate::walker::frontier::{Frontier, WorkItem};
use crate::walker::stream::EntryStream;
use crate::walker::worker::{ScanStats, Worker, WorkerContext};
use crossbeam_channel::{bounded, unbounded};
use globset::{Glob, GlobMatcher};
use regex::Regex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Coordinates one parallel enumeration session
pub struct Scanner {
    config: ScanConfig,
    matcher: GlobMatcher,
    excludes: Vec<Regex>,
    lister: Arc<dyn Lister>,
    cancel: CancellationToken,
}

impl Scanner {
    /// Validate a configuration and prepare a session
    ///
    /// Fails fast, before any worker starts: empty root or pattern, invalid
    /// glob, out-of-range worker count, zero channel capacity, and invalid
    /// exclude regexes are all rejected here.
    pub fn new(config: ScanConfig) -> Result<Self> {
        if config.root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRoot.into());
        }
        if config.pattern.is_empty() {
            return Err(ConfigError::EmptyPattern.into());
        }
        if config.workers == 0 || config.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: config.workers,
                max: MAX_WORKERS,
            }
            .into());
        }
        if let Some(capacity) = config.channel_capacity {
            if capacity == 0 {
                return Err(ConfigError::InvalidChannelCapacity { capacity }.into());
            }
        }

        let matcher = Glob::new(&config.pattern)
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: config.pattern.clone(),
                reason: e.to_string(),
            })?
            .compile_matcher();

        let excludes = config
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            matcher,
            excludes,
            lister: Arc::new(OsLister::new()),
            cancel: CancellationToken::new(),
        })
    }

    /// Substitute the directory-listing capability
    ///
    /// The default is [`OsLister`]; tests and non-filesystem namespaces
    /// supply their own.
    pub fn with_lister(mut self, lister: Arc<dyn Lister>) -> Self {
        self.lister = lister;
        self
    }

    /// Use an externally owned cancellation token for this session
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A clone of the session's cancellation token
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Seed the frontier, start the worker pool, and return the stream
    ///
    /// Returns immediately; the traversal runs concurrently while the
    /// caller drains the stream.
    pub fn start(self) -> Result<EntryStream> {
        let worker_count = self.config.workers;

        info!(
            root = %self.config.root.display(),
            pattern = %self.config.pattern,
            workers = worker_count,
            max_depth = ?self.config.max_depth,
            "starting scan"
        );

        let frontier = Arc::new(Frontier::new(self.config.order));
        frontier.seed(WorkItem::root(self.config.root.clone()));

        let dedup = Arc::new(DedupGuard::new(self.config.dedup));
        let stats = Arc::new(ScanStats::default());
        let outcome = Arc::new(OnceLock::new());
        let active = Arc::new(AtomicUsize::new(worker_count));

        let (sender, receiver) = match self.config.channel_capacity {
            Some(capacity) => bounded(capacity),
            None => unbounded(),
        };

        let ctx = WorkerContext {
            filter: self.config.filter,
            max_depth: self.config.max_depth,
            matcher: self.matcher,
            excludes: Arc::new(self.excludes),
            ignore_names: Arc::new(self.config.ignore_names.iter().cloned().collect::<HashSet<_>>()),
            lister: self.lister,
            frontier: Arc::clone(&frontier),
            dedup,
            results: sender,
            cancel: self.cancel.clone(),
            stats: Arc::clone(&stats),
            outcome: Arc::clone(&outcome),
            active: Arc::clone(&active),
        };

        let mut workers = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            match Worker::spawn(id, ctx.clone()) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Tear the partial pool down before surfacing the error.
                    self.cancel.cancel();
                    frontier.close();
                    active.fetch_sub(worker_count - id, Ordering::AcqRel);
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(e.into());
                }
            }
        }

        // Drop the coordinator's sender clone so only workers hold senders
        // and the channel closes when the last of them retires.
        drop(ctx);

        debug!(count = workers.len(), "workers spawned");

        Ok(EntryStream::new(
            receiver,
            self.cancel,
            outcome,
            stats,
            workers,
        ))
    }
}

/// Enumerate `root` with default configuration and the OS lister
///
/// Equivalent to `Scanner::new(ScanConfig::new(root))?.start()`.
pub fn scan(root: impl Into<std::path::PathBuf>) -> Result<EntryStream> {
    Scanner::new(ScanConfig::new(root))?.start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;

    #[test]
    fn test_rejects_empty_root() {
        let result = Scanner::new(ScanConfig::new(""));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::EmptyRoot))
        ));
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let result = Scanner::new(ScanConfig::new("/data").pattern(""));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::EmptyPattern))
        ));
    }

    #[test]
    fn test_rejects_invalid_pattern() {
        let result = Scanner::new(ScanConfig::new("/data").pattern("[unclosed"));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_rejects_zero_workers() {
        let result = Scanner::new(ScanConfig::new("/data").workers(0));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::InvalidWorkerCount { .. }))
        ));
    }

    #[test]
    fn test_rejects_oversized_worker_count() {
        let result = Scanner::new(ScanConfig::new("/data").workers(MAX_WORKERS + 1));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::InvalidWorkerCount { .. }))
        ));
    }

    #[test]
    fn test_rejects_invalid_exclude() {
        let result = Scanner::new(ScanConfig::new("/data").exclude("[unclosed"));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::InvalidExcludePattern { .. }))
        ));
    }

    #[test]
    fn test_rejects_zero_channel_capacity() {
        let result = Scanner::new(ScanConfig::new("/data").channel_capacity(Some(0)));
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::InvalidChannelCapacity { .. }))
        ));
    }
}
