// File: crates/adtui-model/src/range.rs
// Summary: Mutable closed interval of f64 that notifies observers when its bounds change.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::aspect::{AspectModel, AspectObserver, Dependency};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeAspect {
    Range,
}

/// `[min, max]` with change notification.
///
/// Contract: the range is empty iff `min > max`; `[x, x]` is a valid one-point range.
/// The cleared state is `[f64::MAX, -f64::MAX]`. Mutators only notify when a bound
/// actually changed.
pub struct Range {
    min: Cell<f64>,
    max: Cell<f64>,
    model: AspectModel<RangeAspect>,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min: Cell::new(min), max: Cell::new(max), model: AspectModel::new() }
    }

    /// A cleared range.
    pub fn empty() -> Self { Self::new(f64::MAX, -f64::MAX) }

    /// Convenience for the common shared form.
    pub fn shared(min: f64, max: f64) -> Rc<Self> { Rc::new(Self::new(min, max)) }

    pub fn min(&self) -> f64 { self.min.get() }
    pub fn max(&self) -> f64 { self.max.get() }
    pub fn length(&self) -> f64 { self.max() - self.min() }
    pub fn is_empty(&self) -> bool { self.min() > self.max() }

    pub fn set(&self, min: f64, max: f64) {
        if self.min.get() == min && self.max.get() == max {
            return;
        }
        self.min.set(min);
        self.max.set(max);
        self.model.changed(RangeAspect::Range);
    }

    pub fn set_min(&self, min: f64) { self.set(min, self.max()) }
    pub fn set_max(&self, max: f64) { self.set(self.min(), max) }
    pub fn set_from(&self, other: &Range) { self.set(other.min(), other.max()) }

    pub fn clear(&self) { self.set(f64::MAX, -f64::MAX) }

    pub fn shift(&self, delta: f64) {
        if !self.is_empty() {
            self.set(self.min() + delta, self.max() + delta);
        }
    }

    /// Overlap of the two ranges; empty when either is empty or they are disjoint.
    pub fn intersection(&self, other: &Range) -> Range {
        if self.is_empty() || other.is_empty() {
            return Range::empty();
        }
        let lo = self.min().max(other.min());
        let hi = self.max().min(other.max());
        if lo > hi { Range::empty() } else { Range::new(lo, hi) }
    }

    pub fn intersects(&self, other: &Range) -> bool {
        !self.intersection(other).is_empty()
    }

    pub fn is_same_as(&self, other: &Range) -> bool {
        self.min() == other.min() && self.max() == other.max()
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// Clamp `value` into the range. Empty ranges return `value` untouched.
    pub fn clamp(&self, value: f64) -> f64 {
        if self.is_empty() { value } else { value.clamp(self.min(), self.max()) }
    }

    pub fn model(&self) -> &AspectModel<RangeAspect> { &self.model }

    pub fn add_dependency(&self, observer: &AspectObserver) -> Rc<Dependency<RangeAspect>> {
        self.model.add_dependency(observer)
    }
}

impl Default for Range {
    fn default() -> Self { Self::empty() }
}

/// Copies the bounds only; observers of `self` are not carried over.
impl Clone for Range {
    fn clone(&self) -> Self { Self::new(self.min(), self.max()) }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Range(empty)");
        }
        f.debug_struct("Range").field("min", &self.min()).field("max", &self.max()).finish()
    }
}
