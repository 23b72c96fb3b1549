// File: crates/adtui-model/src/animated.rs
// Summary: Updatable that eases a shared range toward a target range once per tick.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::range::Range;
use crate::updater::{Updatable, Updater};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatedRangeOptions {
    /// Share of the remaining distance covered per second, in `(0, 1]`.
    pub fraction: f64,
    /// Snap distance, relative to the target span.
    pub threshold_ratio: f64,
}

impl Default for AnimatedRangeOptions {
    fn default() -> Self { Self { fraction: 0.95, threshold_ratio: 1e-3 } }
}

impl AnimatedRangeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(ModelError::InvalidFraction(self.fraction));
        }
        Ok(())
    }
}

pub struct AnimatedRange {
    range: Rc<Range>,
    target: Cell<Option<(f64, f64)>>,
    options: AnimatedRangeOptions,
}

impl AnimatedRange {
    pub fn new(range: Rc<Range>, options: AnimatedRangeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { range, target: Cell::new(None), options })
    }

    pub fn range(&self) -> &Rc<Range> { &self.range }

    pub fn target(&self) -> Option<(f64, f64)> { self.target.get() }

    pub fn is_animating(&self) -> bool { self.target.get().is_some() }

    /// Start easing toward `[min, max]`. An empty range jumps straight there.
    pub fn animate_to(&self, min: f64, max: f64) {
        if self.range.is_empty() {
            self.range.set(min, max);
            self.target.set(None);
        } else {
            self.target.set(Some((min, max)));
        }
    }
}

impl Updatable for AnimatedRange {
    fn reset(&self) {
        if let Some((min, max)) = self.target.take() {
            self.range.set(min, max);
        }
    }

    fn update(&self, elapsed_secs: f32) {
        let Some((min, max)) = self.target.get() else { return };
        let threshold = ((max - min).abs() * self.options.threshold_ratio) as f32;
        let fraction = self.options.fraction;
        let next_min = ease(self.range.min(), min, fraction, elapsed_secs, threshold);
        let next_max = ease(self.range.max(), max, fraction, elapsed_secs, threshold);
        self.range.set(next_min, next_max);
        if next_min == min && next_max == max {
            self.target.set(None);
        }
    }
}

/// One lerp step that lands on `to` once rounding stops it from making progress.
/// A zero-width target has a zero threshold, so this is what ends the animation.
fn ease(from: f64, to: f64, fraction: f64, elapsed_secs: f32, threshold: f32) -> f64 {
    let next = Updater::lerp_with_threshold(from, to, fraction, elapsed_secs, threshold);
    if next == from && elapsed_secs > 0.0 { to } else { next }
}
