//! Parallel enumeration engine
//!
//! A fixed pool of workers pulls directory work items from a shared
//! frontier, lists each directory through the Lister capability, pushes
//! subdirectories back onto the frontier, and emits matching entries into
//! a streamed result channel.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │        Scanner           │
//!                  │  - validates config      │
//!                  │  - seeds the frontier    │
//!                  │  - spawns the pool       │
//!                  └────────────┬─────────────┘
//!                               │
//!      ┌────────────┬───────────┴──────────────┐
//!      │            │                          │
//! ┌────▼────┐  ┌────▼────┐               ┌─────▼───┐
//! │Worker 1 │  │Worker 2 │      ...      │Worker N │
//! └────┬────┘  └────┬────┘               └────┬────┘
//!      │            │                         │
//!      ├────────────┴─────────────────────────┤
//!      │                                      │
//!      ▼                                      ▼
//! ┌──────────────────┐              ┌──────────────────┐
//! │     Frontier     │              │  Result Channel  │
//! │ (pending dirs,   │              │ (crossbeam, lazy │
//! │  dedup guarded)  │              │  EntryStream)    │
//! └──────────────────┘              └──────────────────┘
//! ```

pub mod coordinator;
pub mod dedup;
pub mod frontier;
pub mod stream;
pub mod worker;

pub use coordinator::{scan, Scanner};
pub use dedup::DedupGuard;
pub use frontier::{Frontier, FrontierStats, Pop, TaskGuard, WorkItem};
pub use stream::{EntryStream, ScanOutcome};
pub use worker::{ScanStats, Worker};
