// ============================================================================
// spark-toggles - Type Definitions
// Type-erased cell trait and the tagged unions shared by every primitive
// ============================================================================

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::constants::*;

// =============================================================================
// TYPE-ERASED CELL TRAIT
// =============================================================================
//
// Batching and subscriptions don't need to know the value type T. The batch
// keeps Vec<Weak<dyn AnyCell>> and a Subscription keeps Weak<dyn AnyCell>,
// so cells of any value type can be stored side by side.
// =============================================================================

/// Type-erased interface of a state cell.
///
/// Implemented by `CellInner<T>`, the data behind `StateCell<T>`.
pub trait AnyCell: Any {
    /// Get the flags bitmask
    fn flags(&self) -> u32;

    /// Set the flags bitmask
    fn set_flags(&self, flags: u32);

    /// Number of committed changes since creation
    fn version(&self) -> u64;

    /// Number of live subscribers
    fn subscriber_count(&self) -> usize;

    /// Remove the subscriber registered under `id` (no-op if already gone)
    fn unsubscribe(&self, id: u64);

    /// Deliver a deferred notification, if one is pending.
    fn flush(self: Rc<Self>);

    /// Check if a notification is pending
    fn is_dirty(&self) -> bool {
        self.flags() & DIRTY != 0
    }

    /// Check if subscribers have seen the latest commit
    fn is_clean(&self) -> bool {
        self.flags() & CLEAN != 0
    }

    /// Check if the cell is currently applying updates
    fn is_draining(&self) -> bool {
        self.flags() & DRAINING != 0
    }

    /// Mark as dirty (clear status bits, set DIRTY)
    fn mark_dirty(&self) {
        let flags = (self.flags() & STATUS_MASK) | DIRTY;
        self.set_flags(flags);
    }

    /// Mark as clean (clear status bits, set CLEAN)
    fn mark_clean(&self) {
        let flags = (self.flags() & STATUS_MASK) | CLEAN;
        self.set_flags(flags);
    }
}

// =============================================================================
// EQUALITY
// =============================================================================

/// Equality function type for comparing cell values
pub type EqualsFn<T> = fn(&T, &T) -> bool;

// =============================================================================
// INITIAL STATE
// =============================================================================

/// The initial value of a cell: either given directly or produced lazily.
///
/// A lazy producer runs exactly once, when the cell is created.
///
/// # Example
///
/// ```
/// use spark_toggles::InitialState;
///
/// let eager: InitialState<bool> = true.into();
/// assert!(eager.resolve());
///
/// let lazy = InitialState::lazy(|| vec!["a", "b"]);
/// assert_eq!(lazy.resolve(), vec!["a", "b"]);
/// ```
pub enum InitialState<T> {
    /// A value supplied up front
    Value(T),
    /// A producer evaluated once at creation
    Lazy(Box<dyn FnOnce() -> T>),
}

impl<T> InitialState<T> {
    /// Wrap a zero-argument producer.
    pub fn lazy(producer: impl FnOnce() -> T + 'static) -> Self {
        InitialState::Lazy(Box::new(producer))
    }

    /// Produce the value, running the producer if there is one.
    pub fn resolve(self) -> T {
        match self {
            InitialState::Value(value) => value,
            InitialState::Lazy(producer) => producer(),
        }
    }
}

impl<T: Default> Default for InitialState<T> {
    fn default() -> Self {
        InitialState::Value(T::default())
    }
}

impl<T> From<T> for InitialState<T> {
    fn from(value: T) -> Self {
        InitialState::Value(value)
    }
}

/// `None` means no initial value was supplied, which starts the flag at `false`.
impl From<Option<bool>> for InitialState<bool> {
    fn from(value: Option<bool>) -> Self {
        InitialState::Value(value.unwrap_or(false))
    }
}

/// `None` means no initial keys were supplied, which starts the set empty.
impl<K> From<Option<Vec<K>>> for InitialState<Vec<K>> {
    fn from(value: Option<Vec<K>>) -> Self {
        InitialState::Value(value.unwrap_or_default())
    }
}

impl<T: fmt::Debug> fmt::Debug for InitialState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitialState::Value(value) => f.debug_tuple("Value").field(value).finish(),
            InitialState::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

// =============================================================================
// STATE ACTION (host update request)
// =============================================================================

/// An update request for a state cell.
pub enum StateAction<T> {
    /// Replace the value outright
    Replace(T),
    /// Compute the next value from the previous one
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> StateAction<T> {
    /// Wrap an update function.
    pub fn update(f: impl FnOnce(&T) -> T + 'static) -> Self {
        StateAction::Update(Box::new(f))
    }

    /// Compute the next value given the previous one.
    pub fn apply(self, previous: &T) -> T {
        match self {
            StateAction::Replace(value) => value,
            StateAction::Update(f) => f(previous),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAction::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            StateAction::Update(_) => f.write_str("Update(..)"),
        }
    }
}

// =============================================================================
// TOGGLE ACTION
// =============================================================================

/// What a toggle call should do with a boolean.
///
/// Converts from `bool` (set), `Option<bool>` (`None` flips) and
/// [`ToggleAction::compute`].
///
/// # Example
///
/// ```
/// use spark_toggles::ToggleAction;
///
/// assert!(ToggleAction::Toggle.resolve(false));
/// assert!(!ToggleAction::from(false).resolve(true));
/// assert!(ToggleAction::compute(|prev| !prev).resolve(false));
/// assert!(ToggleAction::from(Option::<bool>::None).resolve(false));
/// ```
#[derive(Default)]
pub enum ToggleAction {
    /// Flip the previous value
    #[default]
    Toggle,
    /// Use this value regardless of the previous one
    Set(bool),
    /// Apply a function to the previous value
    Compute(Box<dyn FnOnce(bool) -> bool>),
}

impl ToggleAction {
    /// Wrap a function of the previous value.
    pub fn compute(f: impl FnOnce(bool) -> bool + 'static) -> Self {
        ToggleAction::Compute(Box::new(f))
    }

    /// True unless this is a plain flip.
    pub fn is_explicit(&self) -> bool {
        !matches!(self, ToggleAction::Toggle)
    }

    /// Resolve against the previous value.
    pub fn resolve(self, current: bool) -> bool {
        match self {
            ToggleAction::Toggle => !current,
            ToggleAction::Set(value) => value,
            ToggleAction::Compute(f) => f(current),
        }
    }
}

impl From<bool> for ToggleAction {
    fn from(value: bool) -> Self {
        ToggleAction::Set(value)
    }
}

impl From<Option<bool>> for ToggleAction {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(value) => ToggleAction::Set(value),
            None => ToggleAction::Toggle,
        }
    }
}

impl From<()> for ToggleAction {
    fn from(_: ()) -> Self {
        ToggleAction::Toggle
    }
}

impl fmt::Debug for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleAction::Toggle => f.write_str("Toggle"),
            ToggleAction::Set(value) => f.debug_tuple("Set").field(value).finish(),
            ToggleAction::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
