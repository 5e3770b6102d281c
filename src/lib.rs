//! dirstream - Concurrent Filesystem Enumerator
//!
//! A reusable engine that enumerates a hierarchical namespace (a local
//! filesystem, or anything that can list a directory's children) using a
//! pool of worker threads pulling from a shared work frontier, emitting
//! discovered entries as a lazily-consumed stream with graceful
//! termination, cooperative cancellation, and a depth bound.
//!
//! # Features
//!
//! - **Parallel expansion**: N workers share one frontier of pending
//!   directories; wide trees saturate all of them.
//!
//! - **Streamed results**: the entry point returns immediately; entries
//!   flow through a channel while the traversal runs, optionally bounded
//!   for backpressure.
//!
//! - **Correct completion**: the pool retires only when the frontier is
//!   provably drained (no queued items and no item mid-expansion), so the
//!   stream neither hangs nor closes early.
//!
//! - **Duplicate suppression**: a claim-or-skip guard expands each
//!   directory path at most once per session, containing cyclic namespace
//!   links.
//!
//! - **Error isolation**: an unreadable directory is logged and skipped;
//!   it never aborts the session.
//!
//! # Example
//!
//! ```no_run
//! use dirstream::{ResultFilter, ScanConfig, Scanner};
//!
//! let config = ScanConfig::new("/var/log")
//!     .pattern("*.log")
//!     .filter(ResultFilter::Files)
//!     .workers(8);
//!
//! let mut stream = Scanner::new(config)?.start()?;
//! for entry in stream.by_ref() {
//!     println!("{} ({} bytes)", entry.full_path.display(), entry.size);
//! }
//! assert!(!stream.was_cancelled());
//! # Ok::<(), dirstream::ScanError>(())
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod fs;
pub mod walker;

pub use cancel::CancellationToken;
pub use config::{default_workers, DedupPolicy, FrontierOrder, ResultFilter, ScanConfig};
pub use error::{ConfigError, ListError, Result, ScanError, WorkerError};
pub use fs::{ChildRecord, Entry, FileAttributes, Lister, OsLister};
pub use walker::{scan, EntryStream, ScanOutcome, ScanStats, Scanner};
