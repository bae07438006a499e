// ============================================================================
// spark-toggles - Toggle State Helpers
// ============================================================================
//
// Two small state helpers for component code, built on a single-threaded
// state cell:
//
// - use_toggle_state:       one boolean flag; the setter flips when called
//                           without a value
// - use_toggle_state_array: a set of keys, each independently toggleable,
//                           kept in insertion order
// ============================================================================

#[macro_use]
pub mod macros;

pub mod core;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use crate::core::constants;
pub use crate::core::context::{commit_version, with_context, StateContext};
pub use crate::core::types::{AnyCell, EqualsFn, InitialState, StateAction, ToggleAction};

// Re-export primitives at crate root
pub use primitives::state::{use_state, StateCell, StateOptions, Subscription};
pub use primitives::toggle::{use_toggle_state, ToggleState, ToggleStateAction};
pub use primitives::toggle_array::{
    use_toggle_state_array, ToggleStateArrayAction, ToggleStateArrayValue,
};

// Re-export reactivity functions
pub use reactivity::batching::{batch, is_batching};
pub use reactivity::equality::{equals, never_equals};

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    // =========================================================================
    // Boolean toggle cell
    // =========================================================================

    #[test]
    fn toggle_reads_back_initial_value() {
        for initial in [false, true] {
            let (state, _) = use_toggle_state(initial);
            assert_eq!(state.get(), initial);
        }
    }

    #[test]
    fn toggle_flips_follow_parity() {
        for initial in [false, true] {
            let (state, set_state) = use_toggle_state(initial);
            for n in 1..=6 {
                set_state.toggle();
                assert_eq!(state.get(), initial ^ (n % 2 == 1));
            }
        }
    }

    #[test]
    fn toggle_literal_and_compute() {
        let (state, set_state) = use_toggle_state(false);

        set_state.call(true);
        assert!(state.get());
        set_state.call(true);
        assert!(state.get());

        set_state.call(ToggleAction::compute(|prev| !prev));
        assert!(!state.get());
    }

    // =========================================================================
    // Keyed toggle set
    // =========================================================================

    #[test]
    fn keyed_set_walkthrough() {
        let (is_on, set_on) = use_toggle_state_array(vec!["a", "b"]);
        assert!(is_on.get(&"a"));
        assert!(!is_on.get(&"c"));

        set_on.toggle("c");
        assert_eq!(&*is_on.keys(), &["a", "b", "c"]);
        assert!(is_on.get(&"c"));

        set_on.toggle("a");
        assert_eq!(&*is_on.keys(), &["b", "c"]);
        assert!(!is_on.get(&"a"));

        set_on.set("b", true);
        assert_eq!(&*is_on.keys(), &["c", "b"]);

        set_on.set("x", false);
        assert_eq!(&*is_on.keys(), &["c", "b"]);
    }

    #[test]
    fn keyed_set_value_handle_sees_latest_commit() {
        let (is_on, set_on) = use_toggle_state_array(Option::<Vec<u32>>::None);
        let reader = is_on.clone();

        set_on.toggle(7);
        assert!(reader.get(&7));
        set_on.toggle(7);
        assert!(!reader.get(&7));
    }

    // =========================================================================
    // Host cell integration
    // =========================================================================

    #[test]
    fn components_are_independent() {
        let (flag, set_flag) = use_toggle_state(false);
        let (is_on, set_on) = use_toggle_state_array(vec![1]);

        set_flag.toggle();
        set_on.toggle(1);

        assert!(flag.get());
        assert!(is_on.is_empty());
        assert!(!flag.cell().as_any_cell().is_dirty());
    }

    #[test]
    fn commit_version_counts_every_commit() {
        let before = commit_version();
        let (_, set_flag) = use_toggle_state(false);
        set_flag.toggle();
        set_flag.set(true); // equal, not committed
        set_flag.toggle();
        assert_eq!(commit_version(), before + 2);
    }

    #[test]
    fn batch_coalesces_toggle_notifications() {
        let (is_on, set_on) = use_toggle_state_array(Vec::<&str>::new());
        let runs = Rc::new(Cell::new(0));

        let _sub = on_change!(is_on, runs => |_| runs.set(runs.get() + 1));

        batch(|| {
            set_on.toggle("a");
            set_on.toggle("b");
            set_on.set("a", true);
        });

        assert_eq!(runs.get(), 1);
        assert_eq!(&*is_on.keys(), &["b", "a"]);
    }
}
