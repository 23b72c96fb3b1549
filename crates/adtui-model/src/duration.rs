// File: crates/adtui-model/src/duration.rs
// Summary: Interval payloads (start = sample x, length = duration) and the model that publishes them.

use serde::{Deserialize, Serialize};

use crate::aspect::{AspectModel, AspectObserver, Dependency};
use crate::series::RangedSeries;
use crate::updater::Updatable;
use std::rc::Rc;

/// Duration of an interval that has not finished yet.
pub const UNSPECIFIED_DURATION: i64 = i64::MAX;

pub trait DurationData {
    /// Length in microseconds; [`UNSPECIFIED_DURATION`] for open-ended intervals.
    fn duration_us(&self) -> i64;
}

/// Duration payload that also says how it may be selected.
pub trait ConfigurableDurationData: DurationData {
    /// Whether an open-ended interval can be selected at all.
    fn selectable_when_max_duration(&self) -> bool;
    /// Whether a selection may cover only part of the interval.
    fn can_select_partial_range(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConfigurableDurationData {
    pub duration_us: i64,
    pub selectable_when_max_duration: bool,
    pub select_partial_range: bool,
}

impl DefaultConfigurableDurationData {
    pub fn new(duration_us: i64, selectable_when_max_duration: bool, select_partial_range: bool) -> Self {
        Self { duration_us, selectable_when_max_duration, select_partial_range }
    }

    pub fn is_unfinished(&self) -> bool { self.duration_us == UNSPECIFIED_DURATION }
}

impl DurationData for DefaultConfigurableDurationData {
    fn duration_us(&self) -> i64 { self.duration_us }
}

impl ConfigurableDurationData for DefaultConfigurableDurationData {
    fn selectable_when_max_duration(&self) -> bool { self.selectable_when_max_duration }
    fn can_select_partial_range(&self) -> bool { self.select_partial_range }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DurationAspect {
    DurationData,
}

/// Interval series bound to a view range; fires [`DurationAspect::DurationData`] every tick.
pub struct DurationDataModel<E> {
    series: RangedSeries<E>,
    model: AspectModel<DurationAspect>,
}

impl<E: Clone> DurationDataModel<E> {
    pub fn new(series: RangedSeries<E>) -> Self {
        Self { series, model: AspectModel::new() }
    }

    pub fn shared(series: RangedSeries<E>) -> Rc<Self> { Rc::new(Self::new(series)) }

    pub fn series(&self) -> &RangedSeries<E> { &self.series }

    pub fn aspect(&self) -> &AspectModel<DurationAspect> { &self.model }

    pub fn add_dependency(&self, observer: &AspectObserver) -> Rc<Dependency<DurationAspect>> {
        self.model.add_dependency(observer)
    }
}

impl<E: Clone> Updatable for DurationDataModel<E> {
    fn update(&self, _elapsed_secs: f32) {
        self.model.changed(DurationAspect::DurationData);
    }
}
