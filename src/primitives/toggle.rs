// ============================================================================
// spark-toggles - Toggle State
// A boolean flag whose setter flips when called without a value
// ============================================================================

use crate::core::types::{InitialState, ToggleAction};
use crate::primitives::state::{StateCell, Subscription};

// =============================================================================
// TOGGLE STATE - read side
// =============================================================================

/// Read handle of a boolean toggle cell.
///
/// `get()` always returns the latest committed value.
#[derive(Clone)]
pub struct ToggleState {
    cell: StateCell<bool>,
}

impl ToggleState {
    /// Get the current value.
    pub fn get(&self) -> bool {
        self.cell.get()
    }

    /// Run `f` after every change of the flag.
    pub fn subscribe(&self, f: impl Fn(bool) + 'static) -> Subscription {
        self.cell.subscribe(move |value| f(*value))
    }

    /// The underlying state cell.
    pub fn cell(&self) -> &StateCell<bool> {
        &self.cell
    }
}

impl std::fmt::Debug for ToggleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ToggleState").field(&self.get()).finish()
    }
}

// =============================================================================
// TOGGLE STATE ACTION - write side
// =============================================================================

/// Setter of a boolean toggle cell.
///
/// Every call is turned into an update function of the previous value, so
/// several calls made before anyone reads the flag all take effect, in order.
#[derive(Clone)]
pub struct ToggleStateAction {
    cell: StateCell<bool>,
}

impl ToggleStateAction {
    /// Apply an action: flip (`ToggleAction::Toggle`, `None`, `()`),
    /// set (`bool`) or compute (`ToggleAction::compute`).
    pub fn call(&self, action: impl Into<ToggleAction>) {
        let action = action.into();
        self.cell.update(move |previous| action.resolve(*previous));
    }

    /// Flip the flag.
    pub fn toggle(&self) {
        self.call(ToggleAction::Toggle);
    }

    /// Set the flag regardless of its previous value.
    pub fn set(&self, value: bool) {
        self.call(value);
    }

    /// Set the flag to `f(previous)`.
    pub fn update(&self, f: impl FnOnce(bool) -> bool + 'static) {
        self.call(ToggleAction::compute(f));
    }
}

impl std::fmt::Debug for ToggleStateAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleStateAction").finish_non_exhaustive()
    }
}

// =============================================================================
// USE TOGGLE STATE
// =============================================================================

/// Create a boolean toggle cell.
///
/// `initial` may be a `bool`, `None` (meaning `false`), or a lazy producer
/// via [`InitialState::lazy`], which runs exactly once.
///
/// # Example
///
/// ```
/// use spark_toggles::{use_toggle_state, ToggleAction};
///
/// let (open, set_open) = use_toggle_state(false);
///
/// set_open.toggle();
/// assert!(open.get());
///
/// set_open.call(true);
/// assert!(open.get());
///
/// set_open.call(ToggleAction::compute(|prev| !prev));
/// assert!(!open.get());
/// ```
pub fn use_toggle_state(initial: impl Into<InitialState<bool>>) -> (ToggleState, ToggleStateAction) {
    let cell = StateCell::new(initial);
    (
        ToggleState { cell: cell.clone() },
        ToggleStateAction { cell },
    )
}

// =============================================================================
// TESTS
// =============================================================================
