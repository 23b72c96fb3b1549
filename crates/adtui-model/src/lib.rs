// File: crates/adtui-model/src/lib.rs
// Summary: Core library entry point; exports the observation, series, update-loop and selection API.

pub mod aspect;
pub mod range;
pub mod series;
pub mod duration;
pub mod timer;
pub mod updater;
pub mod animated;
pub mod selection;
pub mod error;

pub use aspect::{Aspect, AspectModel, AspectObserver, Dependency};
pub use range::{Range, RangeAspect};
pub use series::{BaseDataSeries, DefaultDataSeries, RangedSeries, SeriesData, SharedSeries};
pub use duration::{
    ConfigurableDurationData, DefaultConfigurableDurationData, DurationAspect, DurationData, DurationDataModel,
    UNSPECIFIED_DURATION,
};
pub use timer::{FakeTimer, FpsTimer, StopwatchTimer, TickHandler, TimerOptions, ONE_SECOND};
pub use updater::{SharedUpdatable, Updatable, Updater};
pub use animated::{AnimatedRange, AnimatedRangeOptions};
pub use selection::{SelectionAspect, SelectionEvent, SelectionListener, SelectionModel};
pub use error::{ModelError, Result};
