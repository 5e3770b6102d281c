//! Error types for dirstream
//!
//! This module defines the error hierarchy for the enumeration engine:
//! - Configuration errors (rejected synchronously, before any worker starts)
//! - Lister errors (local to one directory, never propagated to the consumer)
//! - Worker thread errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - A single inaccessible directory must never abort the session
//! - Preserve error chains for debugging

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for the dirstream library
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Configuration errors, raised before the worker pool starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root path is empty
    #[error("root path must not be empty")]
    EmptyRoot,

    /// Search pattern is empty
    #[error("search pattern must not be empty")]
    EmptyPattern,

    /// Search pattern is not a valid glob
    #[error("invalid search pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Invalid worker count
    #[error("invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid exclude pattern
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// Invalid result channel capacity
    #[error("invalid channel capacity {capacity}: must be at least 1")]
    InvalidChannelCapacity { capacity: usize },
}

/// Directory listing errors, as classified by the Lister capability
///
/// All three kinds are recoverable: the engine records them, skips the
/// directory, and continues over every other branch.
#[derive(Error, Debug, Clone)]
pub enum ListError {
    /// Path vanished between discovery and expansion
    #[error("path not found: '{}'", .path.display())]
    NotFound { path: PathBuf },

    /// Permission denied
    #[error("access denied: '{}'", .path.display())]
    AccessDenied { path: PathBuf },

    /// Any other host error
    #[error("failed to list '{}': {}", .path.display(), .reason)]
    Other { path: PathBuf, reason: String },
}

impl ListError {
    /// Classify an I/O error from the host filesystem
    pub fn from_io(path: &Path, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ListError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ListError::AccessDenied {
                path: path.to_path_buf(),
            },
            _ => ListError::Other {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    /// The directory this error refers to
    pub fn path(&self) -> &Path {
        match self {
            ListError::NotFound { path }
            | ListError::AccessDenied { path }
            | ListError::Other { path, .. } => path,
        }
    }
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("worker {id} panicked")]
    Panicked { id: usize },

    /// Worker thread could not be spawned
    #[error("failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Result type alias for ScanError
pub type Result<T> = std::result::Result<T, ScanError>;

/// Represents the outcome of expanding a single directory
#[derive(Debug)]
pub enum ExpandOutcome {
    /// Directory was listed and its children dispatched
    Expanded {
        path: PathBuf,
        emitted: usize,
        subdirs: usize,
    },

    /// Directory was not expanded (depth bound, exclusion, or dedup)
    Skipped { path: PathBuf, reason: &'static str },

    /// Lister reported the directory unavailable
    Failed { path: PathBuf, error: ListError },
}

impl ExpandOutcome {
    /// Returns true if this outcome represents a successful expansion
    pub fn is_expanded(&self) -> bool {
        matches!(self, ExpandOutcome::Expanded { .. })
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &Path {
        match self {
            ExpandOutcome::Expanded { path, .. } => path,
            ExpandOutcome::Skipped { path, .. } => path,
            ExpandOutcome::Failed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_error_classification() {
        let path = Path::new("/missing");

        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            ListError::from_io(path, &not_found),
            ListError::NotFound { .. }
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            ListError::from_io(path, &denied),
            ListError::AccessDenied { .. }
        ));

        let other = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(matches!(
            ListError::from_io(path, &other),
            ListError::Other { .. }
        ));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::EmptyRoot;
        let scan_err: ScanError = config_err.into();
        assert!(matches!(scan_err, ScanError::Config(_)));
    }

    #[test]
    fn test_expand_outcome_path() {
        let outcome = ExpandOutcome::Failed {
            path: PathBuf::from("/locked"),
            error: ListError::AccessDenied {
                path: PathBuf::from("/locked"),
            },
        };
        assert!(!outcome.is_expanded());
        assert_eq!(outcome.path(), Path::new("/locked"));
    }
}
