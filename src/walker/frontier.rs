//! Shared work frontier
//!
//! The frontier holds pending directory work items awaiting expansion. It
//! tracks outstanding work as queued items plus items currently being
//! expanded, so "outstanding == 0" means no more work can ever appear and
//! the frontier closes itself. A momentary empty queue is never mistaken
//! for completion: an item popped by a peer still counts as outstanding
//! until that peer calls [`Frontier::task_done`].
//!
//! Ordering is a policy choice: LIFO gives depth-first expansion, FIFO
//! breadth-first. Either way the set of discovered entries is identical.

use crate::config::FrontierOrder;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A pending directory awaiting expansion
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Full path to the directory
    pub path: PathBuf,

    /// Nesting level below the scan root (root = 0)
    pub depth: u32,
}

impl WorkItem {
    /// Create a new work item
    pub fn new(path: PathBuf, depth: u32) -> Self {
        Self { path, depth }
    }

    /// Create the seed item for the scan root
    pub fn root(path: PathBuf) -> Self {
        Self { path, depth: 0 }
    }
}

/// Result of one bounded-wait pop attempt
#[derive(Debug)]
pub enum Pop {
    /// An item was claimed
    Item(WorkItem),

    /// Nothing available yet; the caller should re-check cancellation and retry
    Empty,

    /// The frontier is drained or was closed; the worker can retire
    Closed,
}

/// Statistics for the frontier
#[derive(Debug, Default)]
pub struct FrontierStats {
    /// Total items pushed
    pub pushed: AtomicU64,

    /// Total items popped
    pub popped: AtomicU64,
}

impl FrontierStats {
    /// Total items pushed so far
    pub fn pushed_count(&self) -> u64 {
        self.pushed.load(Ordering::Relaxed)
    }

    /// Total items popped so far
    pub fn popped_count(&self) -> u64 {
        self.popped.load(Ordering::Relaxed)
    }
}

struct State {
    items: VecDeque<WorkItem>,
    /// Queued items plus items currently being expanded
    outstanding: usize,
    closed: bool,
}

/// Shared, thread-safe pool of pending work items
pub struct Frontier {
    state: Mutex<State>,
    work_ready: Condvar,
    order: FrontierOrder,
    stats: FrontierStats,
}

impl Frontier {
    /// Create an empty frontier with the given ordering policy
    pub fn new(order: FrontierOrder) -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                outstanding: 0,
                closed: false,
            }),
            work_ready: Condvar::new(),
            order,
            stats: FrontierStats::default(),
        }
    }

    /// Seed the frontier with the root item
    pub fn seed(&self, item: WorkItem) {
        self.push(item);
    }

    /// Add a work item, waking one idle worker
    ///
    /// Pushes after close (cancellation) are silently dropped; the session
    /// is abandoning its frontier at that point.
    pub fn push(&self, item: WorkItem) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.outstanding += 1;
        state.items.push_back(item);
        self.stats.pushed.fetch_add(1, Ordering::Relaxed);
        self.work_ready.notify_one();
    }

    /// Claim one item, waiting up to `wait` for new work
    ///
    /// Returns [`Pop::Closed`] once the frontier is provably drained: no
    /// queued items and no item mid-expansion anywhere in the pool. The
    /// worker that makes that observation closes the frontier and wakes
    /// every blocked peer, so all workers retire.
    pub fn next(&self, wait: Duration) -> Pop {
        let mut state = self.state.lock();

        if state.closed {
            return Pop::Closed;
        }
        if let Some(item) = Self::take(&mut state.items, self.order) {
            self.stats.popped.fetch_add(1, Ordering::Relaxed);
            return Pop::Item(item);
        }
        if state.outstanding == 0 {
            state.closed = true;
            self.work_ready.notify_all();
            return Pop::Closed;
        }

        // Queue momentarily empty but a peer is mid-expansion and may push
        // more. Wait for a push, a close, or the timeout.
        self.work_ready.wait_for(&mut state, wait);

        if state.closed {
            return Pop::Closed;
        }
        if let Some(item) = Self::take(&mut state.items, self.order) {
            self.stats.popped.fetch_add(1, Ordering::Relaxed);
            return Pop::Item(item);
        }
        if state.outstanding == 0 {
            state.closed = true;
            self.work_ready.notify_all();
            return Pop::Closed;
        }

        Pop::Empty
    }

    /// Record that a previously claimed item has been fully handled
    ///
    /// Every pop must be balanced by exactly one call, on every exit path;
    /// use [`TaskGuard`] rather than calling this directly.
    pub fn task_done(&self) {
        let mut state = self.state.lock();
        state.outstanding = state.outstanding.saturating_sub(1);
        if state.outstanding == 0 && !state.closed {
            state.closed = true;
            self.work_ready.notify_all();
        }
    }

    /// Close the frontier without draining it (cancellation path)
    pub fn close(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            self.work_ready.notify_all();
        }
    }

    /// Check whether the frontier has closed
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Check whether the queue is momentarily empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Current queue length
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Frontier statistics
    pub fn stats(&self) -> &FrontierStats {
        &self.stats
    }

    fn take(items: &mut VecDeque<WorkItem>, order: FrontierOrder) -> Option<WorkItem> {
        match order {
            FrontierOrder::DepthFirst => items.pop_back(),
            FrontierOrder::BreadthFirst => items.pop_front(),
        }
    }
}

/// RAII guard balancing one pop with one [`Frontier::task_done`]
pub struct TaskGuard<'a> {
    frontier: &'a Frontier,
}

impl<'a> TaskGuard<'a> {
    /// Create a guard for an item just popped from `frontier`
    pub fn new(frontier: &'a Frontier) -> Self {
        Self { frontier }
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.frontier.task_done();
    }
}
