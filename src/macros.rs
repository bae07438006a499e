// ============================================================================
// spark-toggles - Ergonomic Macros
// ============================================================================

/// Helper macro to clone variables into a move closure.
///
/// Handles are `Rc`-backed, so subscribers and update functions usually
/// need their own clone of a handle. This removes the `let x = x.clone();`
/// boilerplate.
///
/// # Usage
///
/// ```rust
/// use spark_toggles::{cloned, use_toggle_state};
///
/// let (open, set_open) = use_toggle_state(false);
/// let (other, set_other) = use_toggle_state(false);
///
/// // Keep `other` in sync with `open`
/// let _sub = open.subscribe(cloned!(set_other => move |value| set_other.set(value)));
///
/// set_open.toggle();
/// assert!(other.get());
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Subscribe to a handle with automatic variable capturing.
///
/// Wraps `handle.subscribe(cloned!(... => move |value| ...))`.
///
/// # Usage
///
/// ```rust
/// use spark_toggles::{on_change, use_state};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let count = use_state(0);
/// let total = Rc::new(Cell::new(0));
///
/// let _sub = on_change!(count, total => |value| total.set(total.get() + *value));
///
/// count.set(2);
/// count.set(5);
/// assert_eq!(total.get(), 7);
/// ```
#[macro_export]
macro_rules! on_change {
    // Case 1: With captures
    ($handle:expr, $($deps:ident),+ => |$value:pat_param| $body:expr) => {
        $handle.subscribe($crate::cloned!($($deps),+ => move |$value| $body))
    };
    // Case 2: No captures
    ($handle:expr => |$value:pat_param| $body:expr) => {
        $handle.subscribe(move |$value| $body)
    };
}
