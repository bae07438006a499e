// ============================================================================
// spark-toggles - Reactivity Module
// Notification batching and equality checks for state cells
// ============================================================================

pub mod batching;
pub mod equality;

// Re-export batching functions
pub use batching::{batch, flush_pending_cells, is_batching};

// Re-export equality functions
pub use equality::{equals, never_equals};
