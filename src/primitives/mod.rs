// ============================================================================
// spark-toggles - Primitives Module
// The state cell and the two toggle helpers built on it
// ============================================================================

pub mod state;
pub mod toggle;
pub mod toggle_array;

// Re-export for convenience
pub use state::{use_state, StateCell, StateOptions, Subscription};
pub use toggle::{use_toggle_state, ToggleState, ToggleStateAction};
pub use toggle_array::{use_toggle_state_array, ToggleStateArrayAction, ToggleStateArrayValue};
