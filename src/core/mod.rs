// ============================================================================
// spark-toggles - Core Module
// Fundamental types, traits, and context for state cells
// ============================================================================

pub mod constants;
pub mod context;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use context::{commit_version, with_context, StateContext};
pub use types::{AnyCell, EqualsFn, InitialState, StateAction, ToggleAction};
