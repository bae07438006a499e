// ============================================================================
// spark-toggles - State Context
// Thread-local state shared by every cell on the current thread
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use super::types::AnyCell;

// =============================================================================
// STATE CONTEXT
// =============================================================================

/// Thread-local context holding the global bookkeeping for state cells.
///
/// Cells themselves are independent; the context only knows about batching
/// and the global commit counter.
pub struct StateContext {
    // =========================================================================
    // VERSION COUNTERS
    // =========================================================================
    /// Global commit version - incremented on every committed change
    pub commit_version: Cell<u64>,

    // =========================================================================
    // BATCHING
    // =========================================================================
    /// Current batch depth (for nested batches)
    pub batch_depth: Cell<u32>,

    /// Cells with deferred notifications, flushed when the batch completes
    pub pending_cells: RefCell<Vec<Weak<dyn AnyCell>>>,
}

impl StateContext {
    /// Create a new context with default values
    pub fn new() -> Self {
        Self {
            commit_version: Cell::new(0),
            batch_depth: Cell::new(0),
            pending_cells: RefCell::new(Vec::new()),
        }
    }

    // =========================================================================
    // VERSION COUNTERS
    // =========================================================================

    /// Increment and return the commit version
    pub fn increment_commit_version(&self) -> u64 {
        let v = self.commit_version.get() + 1;
        self.commit_version.set(v);
        v
    }

    /// Get the current commit version
    pub fn get_commit_version(&self) -> u64 {
        self.commit_version.get()
    }

    // =========================================================================
    // BATCHING
    // =========================================================================

    /// Increment batch depth, returns new depth
    pub fn enter_batch(&self) -> u32 {
        let depth = self.batch_depth.get() + 1;
        self.batch_depth.set(depth);
        depth
    }

    /// Decrement batch depth, returns new depth
    pub fn exit_batch(&self) -> u32 {
        let depth = self.batch_depth.get().saturating_sub(1);
        self.batch_depth.set(depth);
        depth
    }

    /// Get current batch depth
    pub fn get_batch_depth(&self) -> u32 {
        self.batch_depth.get()
    }

    /// Check if currently in a batch
    pub fn is_batching(&self) -> bool {
        self.batch_depth.get() > 0
    }

    /// Add a cell whose notification waits for the batch to end
    pub fn add_pending_cell(&self, cell: Weak<dyn AnyCell>) {
        self.pending_cells.borrow_mut().push(cell);
    }

    /// Take all pending cells
    pub fn take_pending_cells(&self) -> Vec<Weak<dyn AnyCell>> {
        self.pending_cells.replace(Vec::new())
    }
}

impl Default for StateContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    /// The thread-local state context
    static CONTEXT: StateContext = StateContext::new();
}

/// Access the thread-local state context.
///
/// # Example
///
/// ```ignore
/// with_context(|ctx| {
///     ctx.increment_commit_version();
/// });
/// ```
pub fn with_context<R>(f: impl FnOnce(&StateContext) -> R) -> R {
    CONTEXT.with(f)
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Get the current global commit version
pub fn commit_version() -> u64 {
    with_context(|ctx| ctx.get_commit_version())
}

// =============================================================================
// TESTS
// =============================================================================
