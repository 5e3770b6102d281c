//! Filesystem boundary: entry records and the directory-listing capability
//!
//! The engine never touches the host filesystem directly. Everything it
//! knows about a namespace comes through the [`Lister`] trait, which lists
//! the immediate children of one directory per call. [`OsLister`] is the
//! production implementation over `std::fs`; tests substitute in-memory
//! mocks.

pub mod lister;
pub mod types;

pub use lister::{Lister, OsLister};
pub use types::{ChildRecord, Entry, FileAttributes};
