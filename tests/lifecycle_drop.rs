use spark_toggles::{
    batch, cloned, use_state, use_toggle_state, use_toggle_state_array, AnyCell,
};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn dropping_subscription_stops_notifications() {
    let (state, set_state) = use_toggle_state(false);
    let runs = Rc::new(Cell::new(0));

    {
        let _sub = state.subscribe(cloned!(runs => move |_| runs.set(runs.get() + 1)));
        set_state.toggle();
        assert_eq!(runs.get(), 1);
        // _sub drops here
    }

    set_state.toggle();
    assert_eq!(runs.get(), 1, "Subscriber should not run after drop");
    assert_eq!(state.cell().subscriber_count(), 0);
}

#[test]
fn subscription_dropped_inside_batch_is_not_notified() {
    let (is_on, set_on) = use_toggle_state_array(vec![1]);
    let runs = Rc::new(Cell::new(0));
    let sub = is_on.subscribe(cloned!(runs => move |_| runs.set(runs.get() + 1)));

    batch(|| {
        set_on.toggle(2);
        drop(sub);
    });

    assert_eq!(runs.get(), 0);
    assert!(is_on.get(&2));
}

#[test]
fn handles_keep_cell_alive() {
    let (state, set_state) = use_toggle_state(false);
    let cell: Rc<dyn AnyCell> = state.cell().as_any_cell();
    drop(state);

    // The setter still owns the cell
    set_state.toggle();
    assert_eq!(cell.version(), 1);
}

#[test]
fn cell_dropped_before_subscription() {
    let sub = {
        let cell = use_state(0);
        let sub = cell.subscribe(|_| {});
        assert!(sub.is_live());
        sub
        // cell drops here
    };

    assert!(!sub.is_live());
    drop(sub); // must not panic
}

#[test]
fn detached_subscription_lives_with_cell() {
    let cell = use_state(0);
    let seen = Rc::new(Cell::new(0));

    cell.subscribe(cloned!(seen => move |value| seen.set(*value))).detach();

    cell.set(9);
    assert_eq!(seen.get(), 9);
    assert_eq!(cell.subscriber_count(), 1);
}
