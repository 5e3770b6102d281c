//! Duplicate-expansion guard
//!
//! Records directory paths already claimed for expansion within one
//! session. Claims are permanent: guard entries are never removed. This is
//! the engine's defense against duplicate pushes and cyclic namespace links
//! (symlinks, junctions); cycles are never detected explicitly, only
//! prevented from causing re-expansion.

use crate::config::DedupPolicy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Claim-or-skip set over directory paths
pub struct DedupGuard {
    seen: Option<Mutex<HashSet<PathBuf>>>,
}

impl DedupGuard {
    /// Create a guard for the given policy
    pub fn new(policy: DedupPolicy) -> Self {
        let seen = match policy {
            DedupPolicy::Directories => Some(Mutex::new(HashSet::new())),
            DedupPolicy::Disabled => None,
        };
        Self { seen }
    }

    /// Atomically claim a path
    ///
    /// Returns true the first time a path is claimed and false on every
    /// subsequent call within the session. Always true when dedup is
    /// disabled.
    pub fn claim(&self, path: &Path) -> bool {
        match &self.seen {
            Some(seen) => seen.lock().insert(path.to_path_buf()),
            None => true,
        }
    }

    /// Number of paths claimed so far (0 when disabled)
    pub fn claimed_count(&self) -> usize {
        match &self.seen {
            Some(seen) => seen.lock().len(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let guard = DedupGuard::new(DedupPolicy::Directories);
        let path = Path::new("/data/sub");

        assert!(guard.claim(path));
        assert!(!guard.claim(path));
        assert!(!guard.claim(path));
        assert_eq!(guard.claimed_count(), 1);
    }

    #[test]
    fn test_distinct_paths() {
        let guard = DedupGuard::new(DedupPolicy::Directories);

        assert!(guard.claim(Path::new("/a")));
        assert!(guard.claim(Path::new("/b")));
        assert_eq!(guard.claimed_count(), 2);
    }

    #[test]
    fn test_disabled_always_claims() {
        let guard = DedupGuard::new(DedupPolicy::Disabled);
        let path = Path::new("/data/sub");

        assert!(guard.claim(path));
        assert!(guard.claim(path));
        assert_eq!(guard.claimed_count(), 0);
    }
}
