// File: crates/adtui-model/tests/series.rs
// Purpose: Validate nearest-index search, range lookup carry-in and ordering checks.

use std::cell::RefCell;
use std::rc::Rc;

use adtui_model::{BaseDataSeries, DefaultDataSeries, ModelError, Range, RangedSeries, SeriesData, SharedSeries};
use proptest::prelude::*;

fn series(xs: &[i64]) -> DefaultDataSeries<i64> {
    xs.iter().map(|&x| (x, x * 10)).collect()
}

#[test]
fn nearest_index_rounds_down_and_clamps() {
    let s = series(&[10, 20, 30, 40]);
    assert_eq!(s.nearest_x_index(20), 1);
    assert_eq!(s.nearest_x_index(25), 1);
    assert_eq!(s.nearest_x_index(39), 2);
    assert_eq!(s.nearest_x_index(5), 0);
    assert_eq!(s.nearest_x_index(1_000), 3);
}

#[test]
fn range_lookup_carries_last_value_before_min() {
    let s = series(&[10, 20, 30, 40]);
    let data = s.data_for_x_range(&Range::new(25.0, 35.0));
    let xs: Vec<i64> = data.iter().map(|d| d.x).collect();
    assert_eq!(xs, vec![20, 30]);
    assert_eq!(data[0], SeriesData::new(20, 200));
}

#[test]
fn range_lookup_before_first_sample_returns_first() {
    let s = series(&[10, 20]);
    let xs: Vec<i64> = s.data_for_x_range(&Range::new(0.0, 5.0)).iter().map(|d| d.x).collect();
    assert_eq!(xs, vec![10]);
}

#[test]
fn empty_inputs_give_empty_results() {
    let empty: DefaultDataSeries<i64> = DefaultDataSeries::new();
    assert!(empty.data_for_x_range(&Range::new(0.0, 100.0)).is_empty());
    assert!(empty.all_data().is_empty());

    let s = series(&[1, 2, 3]);
    assert!(s.data_for_x_range(&Range::empty()).is_empty());
    assert_eq!(s.all_data().len(), 3);
}

#[test]
fn try_add_rejects_out_of_order_samples() {
    let mut s = series(&[10, 20]);
    assert_eq!(s.try_add(15, 0), Err(ModelError::OutOfOrder { x: 15, last: 20 }));
    assert_eq!(s.try_add(20, 1), Ok(()));
    assert_eq!(s.len(), 3);
}

#[test]
fn ranged_series_follows_its_range() {
    let data: SharedSeries<i64> = Rc::new(RefCell::new(series(&[0, 10, 20, 30, 40])));
    let view = Range::shared(12.0, 22.0);
    let ranged = RangedSeries::new(view.clone(), data.clone());
    assert_eq!(ranged.series().iter().map(|d| d.x).collect::<Vec<_>>(), vec![10, 20]);

    view.set(31.0, 50.0);
    data.borrow_mut().add(50, 500);
    assert_eq!(ranged.series().iter().map(|d| d.x).collect::<Vec<_>>(), vec![30, 40, 50]);
}

proptest! {
    #[test]
    fn nearest_index_is_floor_of_sorted_samples(
        mut xs in prop::collection::vec(-1_000i64..1_000, 1..64),
        probe in -1_200i64..1_200,
    ) {
        xs.sort_unstable();
        let s = series(&xs);
        let idx = s.nearest_x_index(probe);
        prop_assert!(idx < xs.len());
        if probe < xs[0] {
            prop_assert_eq!(idx, 0);
        } else {
            let floor = *xs.iter().filter(|&&x| x <= probe).max().unwrap();
            prop_assert_eq!(xs[idx], floor);
            if xs.contains(&probe) {
                // Exact hits land on the leftmost duplicate.
                prop_assert!(idx == 0 || xs[idx - 1] < probe);
            }
        }
    }

    #[test]
    fn range_lookup_always_includes_nearest_to_min(
        mut xs in prop::collection::vec(0i64..500, 1..64),
        lo in 0i64..500,
        span in 0i64..200,
    ) {
        xs.sort_unstable();
        let s = series(&xs);
        let data = s.data_for_x_range(&Range::new(lo as f64, (lo + span) as f64));
        let first = s.nearest_x_index(lo);
        prop_assert!(!data.is_empty());
        prop_assert_eq!(data[0].x, xs[first]);
        prop_assert!(data.iter().all(|d| d.x <= (lo + span).max(xs[0])));
    }
}
