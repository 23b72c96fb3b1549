// File: crates/adtui-model/tests/range.rs
// Purpose: Validate range emptiness, intersection and change-only notification.

use std::cell::Cell;
use std::rc::Rc;

use adtui_model::{AspectObserver, Range, RangeAspect};

fn watch(range: &Range) -> (AspectObserver, Rc<Cell<u32>>) {
    let observer = AspectObserver::new();
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    range.add_dependency(&observer).on_change(RangeAspect::Range, move || c.set(c.get() + 1));
    (observer, count)
}

#[test]
fn default_range_is_empty_and_point_is_not() {
    assert!(Range::default().is_empty());
    assert!(!Range::new(3.0, 3.0).is_empty());
    assert!(Range::new(4.0, 3.0).is_empty());
}

#[test]
fn set_notifies_only_on_change() {
    let range = Range::new(0.0, 10.0);
    let (_observer, count) = watch(&range);

    range.set(0.0, 10.0);
    assert_eq!(count.get(), 0);
    range.set_max(12.0);
    assert_eq!(count.get(), 1);
    range.clear();
    range.clear();
    assert_eq!(count.get(), 2);
    assert!(range.is_empty());
}

#[test]
fn shift_ignores_empty_range() {
    let range = Range::empty();
    let (_observer, count) = watch(&range);
    range.shift(5.0);
    assert_eq!(count.get(), 0);

    range.set(1.0, 2.0);
    range.shift(5.0);
    assert_eq!((range.min(), range.max()), (6.0, 7.0));
}

#[test]
fn intersection_cases() {
    let a = Range::new(0.0, 10.0);
    let b = Range::new(5.0, 15.0);
    let overlap = a.intersection(&b);
    assert_eq!((overlap.min(), overlap.max()), (5.0, 10.0));

    // Touching endpoints still overlap.
    assert!(a.intersects(&Range::new(10.0, 20.0)));
    assert!(!a.intersects(&Range::new(10.5, 20.0)));
    assert!(!a.intersects(&Range::empty()));
}

#[test]
fn clone_copies_bounds_not_observers() {
    let range = Range::new(1.0, 2.0);
    let (_observer, count) = watch(&range);
    let copy = range.clone();
    copy.set(3.0, 4.0);
    assert_eq!(count.get(), 0);
    assert!(copy.is_same_as(&Range::new(3.0, 4.0)));
    assert_eq!(copy.model().dependency_count(), 0);
}

#[test]
fn clamp_and_contains() {
    let range = Range::new(-1.0, 1.0);
    assert_eq!(range.clamp(5.0), 1.0);
    assert_eq!(range.clamp(-5.0), -1.0);
    assert!(range.contains(0.5));
    assert!(!range.contains(1.5));
    assert_eq!(Range::empty().clamp(7.0), 7.0);
    assert_eq!(range.length(), 2.0);
}
