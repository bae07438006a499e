use spark_toggles::{batch, cloned, use_toggle_state, InitialState, ToggleAction};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn initial_value_is_read_back() {
    let (on, _) = use_toggle_state(true);
    assert!(on.get());

    let (off, _) = use_toggle_state(false);
    assert!(!off.get());

    let (absent, _) = use_toggle_state(Option::<bool>::None);
    assert!(!absent.get());
}

#[test]
fn lazy_producer_runs_once() {
    let runs = Rc::new(Cell::new(0));

    let (state, set_state) = use_toggle_state(InitialState::lazy(cloned!(runs => move || {
        runs.set(runs.get() + 1);
        true
    })));

    for _ in 0..5 {
        set_state.toggle();
        let _ = state.get();
    }

    assert_eq!(runs.get(), 1);
}

#[test]
fn three_way_action() {
    let (state, set_state) = use_toggle_state(false);

    // absent -> flip
    set_state.call(ToggleAction::Toggle);
    assert!(state.get());

    // literal -> set regardless of previous
    set_state.call(true);
    assert!(state.get());
    set_state.call(false);
    assert!(!state.get());

    // function -> f(previous)
    set_state.call(ToggleAction::compute(|prev| !prev));
    assert!(state.get());
}

#[test]
fn rapid_calls_apply_in_order() {
    let (state, set_state) = use_toggle_state(false);
    let history = Rc::new(RefCell::new(Vec::new()));

    let _sub = state.subscribe(cloned!(history => move |value| history.borrow_mut().push(value)));

    set_state.toggle();
    set_state.update(|prev| !prev);
    set_state.set(true);
    set_state.toggle();

    assert_eq!(*history.borrow(), vec![true, false, true, false]);
}

#[test]
fn batched_calls_build_on_each_other() {
    let (state, set_state) = use_toggle_state(false);
    let runs = Rc::new(Cell::new(0));
    let _sub = state.subscribe(cloned!(runs => move |_| runs.set(runs.get() + 1)));

    batch(|| {
        // Each update sees the previous one's result, not a stale snapshot
        set_state.toggle();
        set_state.update(|prev| {
            assert!(prev);
            prev
        });
        set_state.toggle();
        set_state.toggle();
    });

    assert!(state.get());
    assert_eq!(runs.get(), 1);
}

#[test]
fn setter_is_cloneable_and_shared() {
    let (state, set_state) = use_toggle_state(false);
    let setters: Vec<_> = (0..3).map(|_| set_state.clone()).collect();

    for setter in &setters {
        setter.toggle();
    }

    assert!(state.get());
}
