// ============================================================================
// spark-toggles - Batching
// Coalesce subscriber notifications across several updates
// ============================================================================

use tracing::debug;

use crate::core::context::with_context;

// =============================================================================
// BATCH
// =============================================================================

/// Batch several updates so subscribers are notified once, afterwards.
///
/// Updates inside the batch are still committed immediately: reads see the
/// new value straight away. Only the notifications are deferred, and a cell
/// that changed several times notifies once when the outermost batch ends.
///
/// # Example
///
/// ```
/// use spark_toggles::{batch, use_toggle_state};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let (open, set_open) = use_toggle_state(false);
/// let runs = Rc::new(Cell::new(0));
///
/// let runs_clone = runs.clone();
/// let _sub = open.subscribe(move |_| runs_clone.set(runs_clone.get() + 1));
///
/// batch(|| {
///     set_open.toggle();
///     set_open.toggle();
///     set_open.toggle();
///     assert!(open.get());
///     assert_eq!(runs.get(), 0);
/// });
///
/// assert_eq!(runs.get(), 1);
/// ```
pub fn batch<T>(f: impl FnOnce() -> T) -> T {
    with_context(|ctx| ctx.enter_batch());

    // Use a guard pattern to ensure we exit the batch even on panic
    struct BatchGuard;

    impl Drop for BatchGuard {
        fn drop(&mut self) {
            let depth = with_context(|ctx| ctx.exit_batch());

            // When outermost batch completes, deliver deferred notifications
            if depth == 0 {
                flush_pending_cells();
            }
        }
    }

    let _guard = BatchGuard;
    f()
}

/// Check if currently inside a batch.
///
/// # Example
///
/// ```
/// use spark_toggles::{batch, is_batching};
///
/// assert!(!is_batching());
///
/// batch(|| {
///     assert!(is_batching());
/// });
///
/// assert!(!is_batching());
/// ```
pub fn is_batching() -> bool {
    with_context(|ctx| ctx.is_batching())
}

/// Deliver every notification deferred by a batch.
///
/// Subscribers may update cells again while this runs; those updates
/// notify immediately, and anything they queue is picked up by the loop.
pub fn flush_pending_cells() {
    loop {
        let pending = with_context(|ctx| ctx.take_pending_cells());
        if pending.is_empty() {
            break;
        }

        debug!(cells = pending.len(), "flushing batched state notifications");

        for cell in pending {
            // Cells dropped during the batch have nobody left to notify
            if let Some(cell) = cell.upgrade() {
                cell.flush();
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
