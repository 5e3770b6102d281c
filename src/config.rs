//! Configuration types for dirstream
//!
//! This module defines:
//! - The scan configuration with chainable setters and validation limits
//! - The result filter (files / directories / both)
//! - The frontier ordering policy and the dedup policy

use std::path::PathBuf;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Which discovered entries the consumer wants emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFilter {
    /// Emit regular files only
    Files,
    /// Emit directories only
    Directories,
    /// Emit both files and directories
    FilesAndDirectories,
}

impl ResultFilter {
    /// True when file entries should be emitted
    pub fn wants_files(&self) -> bool {
        matches!(self, ResultFilter::Files | ResultFilter::FilesAndDirectories)
    }

    /// True when directory entries should be emitted
    pub fn wants_directories(&self) -> bool {
        matches!(
            self,
            ResultFilter::Directories | ResultFilter::FilesAndDirectories
        )
    }
}

/// Ordering policy for the shared work frontier
///
/// Affects traversal order only, never the set of discovered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierOrder {
    /// Stack-like: expand the most recently discovered directory first
    DepthFirst,
    /// Queue-like: expand directories in discovery order
    BreadthFirst,
}

/// Duplicate-expansion policy
///
/// Directories reachable through more than one pending work item are
/// expanded at most once under the default policy. Files are never deduped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Claim each directory path once per session (default)
    Directories,
    /// No duplicate suppression
    Disabled,
}

/// Scan configuration
///
/// Built with chainable setters and validated by [`Scanner::new`]
/// (empty root/pattern, glob syntax, worker bounds, exclude regexes).
///
/// [`Scanner::new`]: crate::Scanner::new
///
/// # Example
///
/// ```no_run
/// use dirstream::{ResultFilter, ScanConfig, Scanner};
///
/// let config = ScanConfig::new("/data")
///     .pattern("*.log")
///     .filter(ResultFilter::Files)
///     .max_depth(Some(3))
///     .workers(8);
/// let stream = Scanner::new(config)?.start()?;
/// # Ok::<(), dirstream::ScanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory to enumerate
    pub root: PathBuf,

    /// Glob pattern matched against leaf names; filters emission only,
    /// never which directories are expanded
    pub pattern: String,

    /// Which entries to emit
    pub filter: ResultFilter,

    /// Maximum entry depth. `None` is unbounded; `Some(0)` yields only the
    /// root's immediate children.
    pub max_depth: Option<u32>,

    /// Number of worker threads
    pub workers: usize,

    /// Frontier ordering policy
    pub order: FrontierOrder,

    /// Result channel capacity; `None` is unbounded, `Some(n)` applies
    /// backpressure to producers when the consumer falls behind
    pub channel_capacity: Option<usize>,

    /// Duplicate-expansion policy
    pub dedup: DedupPolicy,

    /// Leaf names skipped everywhere, in addition to `.` and `..`
    pub ignore_names: Vec<String>,

    /// Regex patterns; directories whose full path matches are not expanded
    pub exclude_patterns: Vec<String>,
}

impl ScanConfig {
    /// Create a configuration with defaults for everything but the root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: "*".to_string(),
            filter: ResultFilter::Files,
            max_depth: None,
            workers: default_workers(),
            order: FrontierOrder::DepthFirst,
            channel_capacity: None,
            dedup: DedupPolicy::Directories,
            ignore_names: vec!["Thumbs.db".to_string()],
            exclude_patterns: Vec::new(),
        }
    }

    /// Set the leaf-name glob pattern
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Set the result filter
    pub fn filter(mut self, filter: ResultFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the depth bound (`None` = unbounded)
    pub fn max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the worker count
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the frontier ordering policy
    pub fn order(mut self, order: FrontierOrder) -> Self {
        self.order = order;
        self
    }

    /// Bound the result channel (`None` = unbounded)
    pub fn channel_capacity(mut self, capacity: Option<usize>) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Set the duplicate-expansion policy
    pub fn dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Add a leaf name to skip everywhere
    pub fn ignore_name(mut self, name: impl Into<String>) -> Self {
        self.ignore_names.push(name.into());
        self
    }

    /// Add an exclude regex matched against full directory paths
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }
}

/// Default worker count: one per logical CPU
///
/// Directory listing on local filesystems is cheap enough that oversubscribing
/// buys little; remote-filesystem listers may want more via `workers()`.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}
