// ============================================================================
// spark-toggles - Equality Functions
// Decide whether a computed value counts as a change
// ============================================================================

// =============================================================================
// STRICT EQUALITY (Default)
// =============================================================================

/// Default strict equality using PartialEq.
/// This is what `use_state()` and both toggle helpers use.
///
/// # Example
/// ```
/// use spark_toggles::reactivity::equality::equals;
///
/// assert!(equals(&true, &true));
/// assert!(!equals(&vec!["a"], &vec!["b"]));
/// ```
pub fn equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

// =============================================================================
// NEVER EQUAL
// =============================================================================

/// Never considers values equal - every update is committed and announced.
///
/// Useful for value types without PartialEq, or when subscribers must see
/// every request even if it recomputes the same value.
///
/// # Example
/// ```
/// use spark_toggles::{StateCell, StateOptions};
/// use spark_toggles::reactivity::equality::never_equals;
///
/// let cell = StateCell::with_options(false, StateOptions { equals: Some(never_equals) });
/// cell.set(false);
/// assert_eq!(cell.version(), 1);
/// ```
pub fn never_equals<T>(_a: &T, _b: &T) -> bool {
    false
}

// =============================================================================
// TESTS
// =============================================================================
