// ============================================================================
// spark-toggles - Toggle State Array
// A set of keys, each independently toggleable, kept in insertion order
// ============================================================================
//
// The state is the ordered sequence of keys that are currently "on". Keys
// only need PartialEq: membership and removal are linear scans, so keys that
// are neither Hash nor Ord work too. Every change builds a new slice, so a
// snapshot handed out by `keys()` never changes under its holder.
// ============================================================================

use std::rc::Rc;

use crate::core::types::{InitialState, ToggleAction};
use crate::primitives::state::{StateCell, Subscription};

// =============================================================================
// SEQUENCE TRANSFORMS
// =============================================================================

/// Whether `key` is one of `keys`.
fn contains<K: PartialEq>(keys: &[K], key: &K) -> bool {
    keys.iter().any(|k| k == key)
}

/// `keys` without `key`, then `key` at the tail.
fn with_key_last<K: PartialEq + Clone>(keys: &[K], key: &K) -> Rc<[K]> {
    keys.iter()
        .filter(|k| *k != key)
        .cloned()
        .chain(std::iter::once(key.clone()))
        .collect()
}

/// `keys` with `key` appended. Caller guarantees `key` is absent.
fn with_key_appended<K: Clone>(keys: &[K], key: &K) -> Rc<[K]> {
    keys.iter().cloned().chain(std::iter::once(key.clone())).collect()
}

/// `keys` without `key`.
fn without_key<K: PartialEq + Clone>(keys: &[K], key: &K) -> Rc<[K]> {
    keys.iter().filter(|k| *k != key).cloned().collect()
}

/// Drop repeated keys, keeping each first occurrence.
fn dedup_keys<K: PartialEq>(keys: Vec<K>) -> Rc<[K]> {
    let mut unique: Vec<K> = Vec::with_capacity(keys.len());
    for key in keys {
        if !unique.contains(&key) {
            unique.push(key);
        }
    }
    Rc::from(unique)
}

fn has_duplicates<K: PartialEq>(keys: &[K]) -> bool {
    keys.iter()
        .enumerate()
        .any(|(i, key)| keys[i + 1..].contains(key))
}

/// Compute the next sequence for one toggle call.
///
/// An explicit value (set or compute) always rebuilds the sequence, so a key
/// set to `true` ends up last even if it was already present. A plain flip
/// only appends an absent key or removes a present one.
pub(crate) fn apply_toggle<K>(keys: &[K], key: &K, action: ToggleAction) -> Rc<[K]>
where
    K: PartialEq + Clone,
{
    let current = contains(keys, key);

    let next = if action.is_explicit() {
        if action.resolve(current) {
            with_key_last(keys, key)
        } else {
            without_key(keys, key)
        }
    } else if current {
        without_key(keys, key)
    } else {
        with_key_appended(keys, key)
    };

    debug_assert!(!has_duplicates(&next), "toggle state array holds a key twice");
    next
}

// =============================================================================
// TOGGLE STATE ARRAY VALUE - read side
// =============================================================================

/// Membership test of a keyed toggle set.
///
/// Always answers from the latest committed sequence.
pub struct ToggleStateArrayValue<K> {
    cell: StateCell<Rc<[K]>>,
}

impl<K> Clone for ToggleStateArrayValue<K> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<K: PartialEq + 'static> ToggleStateArrayValue<K> {
    /// Is `key` currently on?
    pub fn get(&self, key: &K) -> bool {
        self.cell.with(|keys| contains(keys, key))
    }

    /// Snapshot of the keys that are on, in order.
    pub fn keys(&self) -> Rc<[K]> {
        self.cell.get()
    }

    /// Number of keys that are on.
    pub fn len(&self) -> usize {
        self.cell.with(|keys| keys.len())
    }

    /// Whether no key is on.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` with the new sequence after every change.
    pub fn subscribe(&self, f: impl Fn(&[K]) + 'static) -> Subscription {
        self.cell.subscribe(move |keys| f(&**keys))
    }

    /// The underlying state cell.
    pub fn cell(&self) -> &StateCell<Rc<[K]>> {
        &self.cell
    }
}

impl<K: PartialEq + std::fmt::Debug + 'static> std::fmt::Debug for ToggleStateArrayValue<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cell.with(|keys| {
            f.debug_tuple("ToggleStateArrayValue")
                .field(keys)
                .finish()
        })
    }
}

// =============================================================================
// TOGGLE STATE ARRAY ACTION - write side
// =============================================================================

/// Setter of a keyed toggle set.
pub struct ToggleStateArrayAction<K> {
    cell: StateCell<Rc<[K]>>,
}

impl<K> Clone for ToggleStateArrayAction<K> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<K: PartialEq + Clone + 'static> ToggleStateArrayAction<K> {
    /// Apply an action to one key.
    ///
    /// - flip (`ToggleAction::Toggle`, `None`, `()`): an absent key is
    ///   appended, a present key is removed.
    /// - set (`bool`) or compute (`ToggleAction::compute`, which receives
    ///   the key's current membership): `true` moves the key to the tail,
    ///   `false` removes it.
    pub fn call(&self, key: K, action: impl Into<ToggleAction>) {
        let action = action.into();
        self.cell.update(move |keys| apply_toggle(keys, &key, action));
    }

    /// Flip one key.
    pub fn toggle(&self, key: K) {
        self.call(key, ToggleAction::Toggle);
    }

    /// Turn one key on (moving it to the tail) or off.
    pub fn set(&self, key: K, value: bool) {
        self.call(key, value);
    }

    /// Set one key to `f(current membership)`.
    pub fn update(&self, key: K, f: impl FnOnce(bool) -> bool + 'static) {
        self.call(key, ToggleAction::compute(f));
    }
}

impl<K> std::fmt::Debug for ToggleStateArrayAction<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToggleStateArrayAction").finish_non_exhaustive()
    }
}

// =============================================================================
// USE TOGGLE STATE ARRAY
// =============================================================================

/// Create a keyed toggle set.
///
/// `initial` may be a `Vec<K>`, `None` (empty), or a lazy producer via
/// [`InitialState::lazy`], which runs exactly once. A key repeated in the
/// initial list is kept once, at its first position.
///
/// A call that leaves the sequence unchanged, such as turning off an absent
/// key or turning on the key already at the tail, commits nothing and does
/// not notify subscribers.
///
/// # Example
///
/// ```
/// use spark_toggles::use_toggle_state_array;
///
/// let (is_open, set_open) = use_toggle_state_array(vec!["a", "b"]);
/// assert!(is_open.get(&"a"));
/// assert!(!is_open.get(&"c"));
///
/// set_open.toggle("c");
/// assert_eq!(&*is_open.keys(), &["a", "b", "c"]);
///
/// // An explicit `true` moves a present key to the tail
/// set_open.set("a", true);
/// assert_eq!(&*is_open.keys(), &["b", "c", "a"]);
/// ```
pub fn use_toggle_state_array<K>(
    initial: impl Into<InitialState<Vec<K>>>,
) -> (ToggleStateArrayValue<K>, ToggleStateArrayAction<K>)
where
    K: PartialEq + Clone + 'static,
{
    let initial = initial.into();
    let cell: StateCell<Rc<[K]>> =
        StateCell::new(InitialState::lazy(move || dedup_keys(initial.resolve())));
    (
        ToggleStateArrayValue { cell: cell.clone() },
        ToggleStateArrayAction { cell },
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn keys(list: &[&'static str]) -> Rc<[&'static str]> {
        Rc::from(list)
    }

    #[test]
    fn flip_appends_absent_key() {
        let next = apply_toggle(&["a", "b"], &"c", ToggleAction::Toggle);
        assert_eq!(next, keys(&["a", "b", "c"]));
    }

    #[test]
    fn flip_removes_present_key_in_place() {
        let next = apply_toggle(&["a", "b", "c"], &"a", ToggleAction::Toggle);
        assert_eq!(next, keys(&["b", "c"]));
    }

    #[test]
    fn set_true_moves_present_key_to_tail() {
        let next = apply_toggle(&["b", "c"], &"b", ToggleAction::Set(true));
        assert_eq!(next, keys(&["c", "b"]));
    }

    #[test]
    fn set_false_on_absent_key_is_noop() {
        let next = apply_toggle(&["a"], &"x", ToggleAction::Set(false));
        assert_eq!(next, keys(&["a"]));
    }

    #[test]
    fn compute_receives_current_membership() {
        let next = apply_toggle(&["a"], &"a", ToggleAction::compute(|on| !on));
        assert_eq!(next, keys(&[]));

        let next = apply_toggle(&["a"], &"b", ToggleAction::compute(|on| !on));
        assert_eq!(next, keys(&["a", "b"]));

        // Computing "stay on" still moves the key to the tail
        let next = apply_toggle(&["a", "b"], &"a", ToggleAction::compute(|on| on));
        assert_eq!(next, keys(&["b", "a"]));
    }

    #[test]
    fn duplicate_detection() {
        assert!(!has_duplicates(&["a", "b", "c"]));
        assert!(has_duplicates(&["a", "b", "a"]));
        assert!(!has_duplicates::<&str>(&[]));
    }

    #[test]
    fn repeated_initial_keys_are_kept_once() {
        assert_eq!(dedup_keys(vec!["a", "b", "a", "c", "b"]), keys(&["a", "b", "c"]));

        let (is_on, set_on) = use_toggle_state_array(vec!["a", "a", "b"]);
        set_on.toggle("c");
        assert_eq!(&*is_on.keys(), &["a", "b", "c"]);
    }

    #[test]
    fn keys_without_hash_or_ord() {
        #[derive(Clone, PartialEq, Debug)]
        struct Point {
            x: f64,
            y: f64,
        }

        let (is_on, set_on) = use_toggle_state_array(vec![Point { x: 0.0, y: 1.0 }]);
        set_on.toggle(Point { x: 2.5, y: 2.5 });
        set_on.toggle(Point { x: 0.0, y: 1.0 });

        assert!(is_on.get(&Point { x: 2.5, y: 2.5 }));
        assert!(!is_on.get(&Point { x: 0.0, y: 1.0 }));
        assert_eq!(is_on.len(), 1);
    }

    #[test]
    fn snapshots_are_not_mutated() {
        let (is_on, set_on) = use_toggle_state_array(vec![1, 2, 3]);
        let before = is_on.keys();

        set_on.toggle(2);
        set_on.set(1, true);

        assert_eq!(&*before, &[1, 2, 3]);
        assert_eq!(&*is_on.keys(), &[3, 1]);
    }

    #[test]
    fn lazy_initial_keys_run_once() {
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let (is_on, set_on) = use_toggle_state_array(InitialState::lazy(move || {
            runs_clone.set(runs_clone.get() + 1);
            vec!["x"]
        }));

        assert_eq!(runs.get(), 1);
        set_on.toggle("x");
        assert!(is_on.is_empty());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn default_is_empty() {
        let (is_on, _) = use_toggle_state_array::<String>(Option::<Vec<String>>::None);
        assert!(is_on.is_empty());
        assert!(!is_on.get(&String::from("anything")));
    }

    #[test]
    fn unchanged_sequence_does_not_notify() {
        let (is_on, set_on) = use_toggle_state_array(vec!["a", "b"]);
        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let _sub = is_on.subscribe(move |_| runs_clone.set(runs_clone.get() + 1));

        set_on.set("x", false);
        set_on.set("b", true);
        set_on.update("x", |on| on);
        assert_eq!(runs.get(), 0);
        assert_eq!(is_on.cell().version(), 0);
        assert_eq!(&*is_on.keys(), &["a", "b"]);

        set_on.set("a", true);
        assert_eq!(runs.get(), 1);
        assert_eq!(&*is_on.keys(), &["b", "a"]);
    }

    #[test]
    fn debug_output() {
        let (is_on, set_on) = use_toggle_state_array(vec!["a"]);
        assert_eq!(format!("{:?}", is_on), "ToggleStateArrayValue([\"a\"])");
        assert!(format!("{:?}", set_on).contains("ToggleStateArrayAction"));
    }
}
