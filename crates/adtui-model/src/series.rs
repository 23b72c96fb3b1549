// File: crates/adtui-model/src/series.rs
// Summary: Append-only, x-sorted data series with binary-search range lookup.
// Notes:
// - x values are 64-bit timestamps (microseconds in the profilers) and must be
//   non-decreasing. `add` debug-asserts it; `try_add` enforces it.
// - Range lookups intentionally carry the last sample at-or-before `range.min`
//   into the result so step-like renderers know the value entering the view.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ModelError, Result};
use crate::range::Range;

/// One `(x, value)` sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeriesData<E> {
    pub x: i64,
    pub value: E,
}

impl<E> SeriesData<E> {
    pub fn new(x: i64, value: E) -> Self { Self { x, value } }
}

/// Storage contract plus the shared lookup algorithms.
///
/// Implementors provide indexed access and append; everything else is derived.
pub trait BaseDataSeries<E> {
    fn len(&self) -> usize;
    fn x_at(&self, index: usize) -> i64;
    fn y_at(&self, index: usize) -> E;
    /// Append a sample. Callers keep `x` non-decreasing.
    fn add(&mut self, x: i64, value: E);

    fn is_empty(&self) -> bool { self.len() == 0 }

    fn last_x(&self) -> Option<i64> {
        if self.is_empty() { None } else { Some(self.x_at(self.len() - 1)) }
    }

    /// Append after checking the ordering invariant.
    fn try_add(&mut self, x: i64, value: E) -> Result<()> {
        if let Some(last) = self.last_x() {
            if x < last {
                return Err(ModelError::OutOfOrder { x, last });
            }
        }
        self.add(x, value);
        Ok(())
    }

    /// Index of the sample at `x`, or of the last sample before it.
    ///
    /// Exact hits resolve to the leftmost duplicate. Misses round down, clamped to
    /// `[0, len - 1]`. Returns 0 for an empty series.
    fn nearest_x_index(&self, x: i64) -> usize {
        let len = self.len();
        if len == 0 {
            return 0;
        }
        let (mut lo, mut hi) = (0usize, len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.x_at(mid) < x { lo = mid + 1; } else { hi = mid; }
        }
        let index = if lo < len && self.x_at(lo) == x { lo } else { lo.saturating_sub(1) };
        index.min(len - 1)
    }

    /// Samples in `[nearest(min), nearest(max)]`; empty for an empty series or range.
    fn data_for_x_range(&self, range: &Range) -> Vec<SeriesData<E>> {
        if self.is_empty() || range.is_empty() {
            return Vec::new();
        }
        let from = self.nearest_x_index(range.min() as i64);
        let to = self.nearest_x_index(range.max() as i64) + 1;
        materialize(self, from, to)
    }

    fn all_data(&self) -> Vec<SeriesData<E>> { materialize(self, 0, self.len()) }
}

fn materialize<E, S: BaseDataSeries<E> + ?Sized>(series: &S, from: usize, to: usize) -> Vec<SeriesData<E>> {
    (from..to.max(from)).map(|i| SeriesData::new(series.x_at(i), series.y_at(i))).collect()
}

/// Series shared between the producer that appends and the models that read.
pub type SharedSeries<E> = Rc<RefCell<dyn BaseDataSeries<E>>>;

/// Plain in-memory series: parallel x and value vectors.
#[derive(Clone, Debug)]
pub struct DefaultDataSeries<E> {
    xs: Vec<i64>,
    values: Vec<E>,
}

impl<E: Clone> DefaultDataSeries<E> {
    pub fn new() -> Self { Self { xs: Vec::new(), values: Vec::new() } }
}

impl<E: Clone> Default for DefaultDataSeries<E> {
    fn default() -> Self { Self::new() }
}

impl<E: Clone> BaseDataSeries<E> for DefaultDataSeries<E> {
    fn len(&self) -> usize { self.xs.len() }
    fn x_at(&self, index: usize) -> i64 { self.xs[index] }
    fn y_at(&self, index: usize) -> E { self.values[index].clone() }

    fn add(&mut self, x: i64, value: E) {
        debug_assert!(self.xs.last().map_or(true, |&last| x >= last), "x values must be non-decreasing");
        self.xs.push(x);
        self.values.push(value);
    }
}

impl<E: Clone> FromIterator<(i64, E)> for DefaultDataSeries<E> {
    fn from_iter<I: IntoIterator<Item = (i64, E)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (x, value) in iter {
            series.add(x, value);
        }
        series
    }
}

/// A series viewed through a (usually animated) range.
pub struct RangedSeries<E> {
    range: Rc<Range>,
    series: SharedSeries<E>,
}

impl<E: Clone> RangedSeries<E> {
    pub fn new(range: Rc<Range>, series: SharedSeries<E>) -> Self { Self { range, series } }

    /// Samples currently in view.
    pub fn series(&self) -> Vec<SeriesData<E>> {
        self.series.borrow().data_for_x_range(&self.range)
    }

    pub fn range(&self) -> &Rc<Range> { &self.range }
    pub fn data_series(&self) -> &SharedSeries<E> { &self.series }
}

impl<E> Clone for RangedSeries<E> {
    fn clone(&self) -> Self { Self { range: self.range.clone(), series: self.series.clone() } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_with_inverted_bounds_is_empty() {
        let series: DefaultDataSeries<u8> = [(1, 0u8), (2, 0)].into_iter().collect();
        assert!(materialize(&series, 2, 1).is_empty());
    }

    #[test]
    fn duplicates_resolve_leftmost() {
        let series: DefaultDataSeries<char> = [(1, 'a'), (5, 'b'), (5, 'c'), (5, 'd'), (9, 'e')].into_iter().collect();
        assert_eq!(series.nearest_x_index(5), 1);
        assert_eq!(series.nearest_x_index(6), 3);
    }
}
