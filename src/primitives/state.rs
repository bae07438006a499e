// ============================================================================
// spark-toggles - State Cell
// The host state primitive: read, queued updates, subscriber notification
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::core::constants::*;
use crate::core::context::with_context;
use crate::core::types::{AnyCell, EqualsFn, InitialState, StateAction};
use crate::reactivity::equality::equals;

/// A dependent of a cell, run after every committed change
type SubscriberFn<T> = Rc<dyn Fn(&T)>;

// =============================================================================
// CELL INNER (the data behind StateCell<T>)
// =============================================================================

/// The internal data for a state cell.
///
/// Kept separate from `StateCell<T>` so it can be stored as `Rc<dyn AnyCell>`
/// by batches and subscriptions.
pub struct CellInner<T> {
    /// Flags bitmask (status + bookkeeping)
    flags: Cell<u32>,

    /// The current committed value
    value: RefCell<T>,

    /// Number of committed changes
    version: Cell<u64>,

    /// Update requests waiting to be applied, in call order
    queue: RefCell<VecDeque<StateAction<T>>>,

    /// Dependents, keyed by subscription id
    subscribers: RefCell<Vec<(u64, SubscriberFn<T>)>>,

    next_subscriber_id: Cell<u64>,

    /// Equality function deciding whether a computed value is a change
    equals: EqualsFn<T>,
}

/// Sets DRAINING for the lifetime of the guard, restoring it on drop.
///
/// While DRAINING is set, new requests are queued instead of applied, so no
/// update ever runs against a borrowed value.
struct DrainingGuard<'a> {
    flags: &'a Cell<u32>,
    was_draining: bool,
}

impl<'a> DrainingGuard<'a> {
    fn enter(flags: &'a Cell<u32>) -> Self {
        let was_draining = flags.get() & DRAINING != 0;
        flags.set(flags.get() | DRAINING);
        Self {
            flags,
            was_draining,
        }
    }
}

impl Drop for DrainingGuard<'_> {
    fn drop(&mut self) {
        if !self.was_draining {
            self.flags.set(self.flags.get() & !DRAINING);
        }
    }
}

impl<T: 'static> CellInner<T> {
    fn new(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            flags: Cell::new(CLEAN),
            value: RefCell::new(value),
            version: Cell::new(0),
            queue: RefCell::new(VecDeque::new()),
            subscribers: RefCell::new(Vec::new()),
            next_subscriber_id: Cell::new(0),
            equals,
        }
    }

    /// Queue a request and apply it unless another request is in flight.
    fn enqueue(self: &Rc<Self>, action: StateAction<T>) {
        self.queue.borrow_mut().push_back(action);

        if self.is_draining() {
            trace!(
                queued = self.queue.borrow().len(),
                "state update queued behind an in-flight update"
            );
            return;
        }

        self.drain();
    }

    /// Apply queued requests one by one until the queue is empty.
    fn drain(self: &Rc<Self>) {
        let _guard = DrainingGuard::enter(&self.flags);

        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(action) = next else {
                break;
            };

            let next_value = {
                let previous = self.value.borrow();
                action.apply(&previous)
            };

            if (self.equals)(&self.value.borrow(), &next_value) {
                continue;
            }

            self.value.replace(next_value);
            let version = self.version.get() + 1;
            self.version.set(version);
            let commit = with_context(|ctx| ctx.increment_commit_version());
            trace!(
                version,
                commit,
                subscribers = self.subscriber_count(),
                "state committed"
            );

            self.mark_dirty();
            if with_context(|ctx| ctx.is_batching()) {
                self.schedule_flush();
            } else {
                self.notify();
            }
        }
    }

    /// Register with the current batch, once per batch.
    fn schedule_flush(self: &Rc<Self>) {
        if self.flags() & QUEUED != 0 {
            return;
        }
        self.set_flags(self.flags() | QUEUED);

        let weak: Weak<dyn AnyCell> = Rc::downgrade(self) as Weak<dyn AnyCell>;
        with_context(|ctx| ctx.add_pending_cell(weak));
    }

    /// Run every subscriber against the committed value, if it is dirty.
    fn notify(self: &Rc<Self>) {
        self.set_flags(self.flags() & !QUEUED);
        if !self.is_dirty() {
            return;
        }
        self.mark_clean();

        // Collect first so subscribers can (un)subscribe while we iterate
        let subscribers: Vec<SubscriberFn<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();

        if subscribers.is_empty() {
            return;
        }

        self.read(|value| {
            for subscriber in &subscribers {
                subscriber(value);
            }
        });
    }

    /// Borrow the value for user code. Requests made meanwhile are applied
    /// once the outermost borrow ends.
    fn read<R>(self: &Rc<Self>, f: impl FnOnce(&T) -> R) -> R {
        let outermost = !self.is_draining();

        let result = {
            let _guard = DrainingGuard::enter(&self.flags);
            let value = self.value.borrow();
            f(&value)
        };

        if outermost && !self.queue.borrow().is_empty() {
            self.drain();
        }

        result
    }

    fn subscribe(&self, subscriber: SubscriberFn<T>) -> u64 {
        let id = self.next_subscriber_id.get();
        self.next_subscriber_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, subscriber));
        id
    }
}

impl<T: 'static> AnyCell for CellInner<T> {
    fn flags(&self) -> u32 {
        self.flags.get()
    }

    fn set_flags(&self, flags: u32) {
        self.flags.set(flags);
    }

    fn version(&self) -> u64 {
        self.version.get()
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    fn flush(self: Rc<Self>) {
        self.notify();
    }
}

// =============================================================================
// STATE CELL<T> - The public handle
// =============================================================================

/// Options for creating a state cell.
pub struct StateOptions<T> {
    pub equals: Option<EqualsFn<T>>,
}

impl<T> Default for StateOptions<T> {
    fn default() -> Self {
        Self { equals: None }
    }
}

/// A single-threaded state cell.
///
/// Updates are requests: a replacement value or a function of the previous
/// value. Requests apply strictly in call order; one made while another is
/// being applied (from an update function or a subscriber) waits its turn
/// and sees the value the earlier request produced. After every committed
/// change the subscribers run, unless a [`batch`](crate::batch) defers them.
///
/// Cloning the handle shares the cell.
///
/// # Example
///
/// ```
/// use spark_toggles::use_state;
///
/// let count = use_state(0);
/// count.update(|n| n + 1);
/// count.update(|n| n + 1);
/// assert_eq!(count.get(), 2);
///
/// count.set(10);
/// assert_eq!(count.get(), 10);
/// ```
pub struct StateCell<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> StateCell<T> {
    /// Create a cell, resolving a lazy initial value now.
    pub fn new(initial: impl Into<InitialState<T>>) -> Self
    where
        T: PartialEq,
    {
        Self::new_with_equals(initial, equals)
    }

    /// Create a cell with a custom equality function.
    pub fn new_with_equals(initial: impl Into<InitialState<T>>, equals: EqualsFn<T>) -> Self {
        Self {
            inner: Rc::new(CellInner::new(initial.into().resolve(), equals)),
        }
    }

    /// Create a cell from options (default equality is PartialEq).
    pub fn with_options(initial: impl Into<InitialState<T>>, options: StateOptions<T>) -> Self
    where
        T: PartialEq,
    {
        match options.equals {
            Some(eq) => Self::new_with_equals(initial, eq),
            None => Self::new(initial),
        }
    }

    /// Get the current value (cloning).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Access the current value with a closure (avoids cloning).
    ///
    /// Updates requested inside `f` are applied after it returns.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.read(f)
    }

    /// Request a replacement value.
    pub fn set(&self, value: T) {
        self.dispatch(StateAction::Replace(value));
    }

    /// Request a new value computed from the previous one.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.dispatch(StateAction::update(f));
    }

    /// Submit an update request.
    pub fn dispatch(&self, action: StateAction<T>) {
        self.inner.enqueue(action);
    }

    /// Run `f` after every committed change, until the returned
    /// [`Subscription`] is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use spark_toggles::use_state;
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    ///
    /// let name = use_state(String::from("a"));
    /// let seen = Rc::new(Cell::new(0));
    ///
    /// let seen_clone = seen.clone();
    /// let sub = name.subscribe(move |_| seen_clone.set(seen_clone.get() + 1));
    ///
    /// name.set(String::from("b"));
    /// name.set(String::from("b")); // equal, not a change
    /// assert_eq!(seen.get(), 1);
    ///
    /// drop(sub);
    /// name.set(String::from("c"));
    /// assert_eq!(seen.get(), 1);
    /// ```
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.subscribe(Rc::new(f));
        let cell: Weak<dyn AnyCell> = Rc::downgrade(&self.inner) as Weak<dyn AnyCell>;
        Subscription {
            cell,
            id,
            attached: true,
        }
    }

    /// Number of committed changes since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }

    /// Check whether two handles share the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get the cell as a type-erased AnyCell.
    pub fn as_any_cell(&self) -> Rc<dyn AnyCell> {
        self.inner.clone()
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.version())
            .finish()
    }
}

/// Create a new state cell.
///
/// # Example
///
/// ```
/// use spark_toggles::{use_state, InitialState, StateCell};
///
/// let eager = use_state(5);
/// let lazy: StateCell<i32> = use_state(InitialState::lazy(|| 2 + 3));
/// assert_eq!(eager.get(), lazy.get());
/// ```
pub fn use_state<T>(initial: impl Into<InitialState<T>>) -> StateCell<T>
where
    T: PartialEq + 'static,
{
    StateCell::new(initial)
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Handle to a subscriber. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cell: Weak<dyn AnyCell>,
    id: u64,
    attached: bool,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn dispose(self) {
        drop(self);
    }

    /// Keep the subscriber for as long as the cell lives.
    pub fn detach(mut self) {
        self.attached = false;
    }

    /// Check whether the cell is still alive.
    pub fn is_live(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.attached {
            return;
        }
        if let Some(cell) = self.cell.upgrade() {
            cell.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
