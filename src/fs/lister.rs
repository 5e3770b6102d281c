//! The directory-listing capability
//!
//! A [`Lister`] lists the immediate children of exactly one directory per
//! call. Any OS resource backing the listing is scoped inside that call;
//! nothing is held across worker iterations.

use crate::cancel::CancellationToken;
use crate::error::ListError;
use crate::fs::types::{ChildRecord, FileAttributes};
use std::fs;
use std::path::Path;

/// How many children to read between cancellation checks in [`OsLister`]
const CANCEL_CHECK_INTERVAL: usize = 128;

/// Capability that lists the immediate children of one directory
///
/// Implementations must be safe to call from multiple worker threads at
/// once. Failures are classified into the three [`ListError`] kinds; the
/// engine treats all three identically (skip the directory, continue the
/// session).
pub trait Lister: Send + Sync {
    /// List the immediate children of `dir`
    ///
    /// Implementations should observe `cancel` where feasible and may
    /// return a partial listing once cancellation is requested.
    fn list(&self, dir: &Path, cancel: &CancellationToken) -> Result<Vec<ChildRecord>, ListError>;
}

/// Production lister backed by `std::fs::read_dir`
///
/// Symlinks are reported with the symlink bit and are never classified as
/// directories, so the engine does not descend through them. Children whose
/// metadata cannot be read are skipped individually rather than failing the
/// whole directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLister;

impl OsLister {
    /// Create a new OS lister
    pub fn new() -> Self {
        Self
    }
}

impl Lister for OsLister {
    fn list(&self, dir: &Path, cancel: &CancellationToken) -> Result<Vec<ChildRecord>, ListError> {
        let read_dir = fs::read_dir(dir).map_err(|e| ListError::from_io(dir, &e))?;

        let mut children = Vec::new();
        for (index, dent) in read_dir.enumerate() {
            if index % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                break;
            }

            let dent = match dent {
                Ok(d) => d,
                Err(_) => continue,
            };

            // DirEntry::metadata does not traverse symlinks, so a link to a
            // directory is reported as a symlink, not a directory.
            let metadata = match dent.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };

            let name = dent.file_name().to_string_lossy().into_owned();
            let is_directory = metadata.is_dir();

            let mut bits = 0u32;
            if is_directory {
                bits |= FileAttributes::DIRECTORY;
            }
            if metadata.permissions().readonly() {
                bits |= FileAttributes::READ_ONLY;
            }
            if metadata.file_type().is_symlink() {
                bits |= FileAttributes::SYMLINK;
            }
            if name.starts_with('.') {
                bits |= FileAttributes::HIDDEN;
            }

            children.push(ChildRecord {
                name,
                is_directory,
                size: if is_directory { 0 } else { metadata.len() },
                attributes: FileAttributes::from_bits(bits),
            });
        }

        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_os_lister_reads_children() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join("a.txt")).unwrap();
        f.write_all(b"hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let cancel = CancellationToken::new();
        let mut children = OsLister::new().list(dir.path(), &cancel).unwrap();
        children.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "a.txt");
        assert!(!children[0].is_directory);
        assert_eq!(children[0].size, 5);
        assert_eq!(children[1].name, "sub");
        assert!(children[1].is_directory);
        assert!(children[1].attributes.is_directory());
    }

    #[test]
    fn test_os_lister_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let cancel = CancellationToken::new();
        let err = OsLister::new().list(&missing, &cancel).unwrap_err();
        assert!(matches!(err, ListError::NotFound { .. }));
    }

    #[test]
    fn test_os_lister_hidden_convention() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();

        let cancel = CancellationToken::new();
        let children = OsLister::new().list(dir.path(), &cancel).unwrap();
        assert_eq!(children.len(), 1);
        assert!(children[0].attributes.is_hidden());
    }
}
