// File: crates/adtui-model/src/timer.rs
// Summary: Tick sources for the updater: a polled frame-rate timer and a manual timer for tests.

use std::cell::{Cell, RefCell};
use std::rc::Weak;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ModelError, Result};

pub const ONE_SECOND: Duration = Duration::from_secs(1);

/// Receiver of timer ticks. `elapsed` is the time since the previous tick.
pub trait TickHandler {
    fn on_tick(&self, elapsed: Duration);
}

/// External tick source. The handler is held weakly so the timer never keeps it alive.
pub trait StopwatchTimer {
    fn set_handler(&self, handler: Weak<dyn TickHandler>);
    fn start(&self);
    fn stop(&self);
    fn is_running(&self) -> bool;
}

#[derive(Default)]
struct HandlerSlot(RefCell<Option<Weak<dyn TickHandler>>>);

impl HandlerSlot {
    fn set(&self, handler: Weak<dyn TickHandler>) {
        *self.0.borrow_mut() = Some(handler);
    }

    fn dispatch(&self, elapsed: Duration) -> bool {
        let handler = self.0.borrow().as_ref().and_then(Weak::upgrade);
        match handler {
            Some(handler) => {
                handler.on_tick(elapsed);
                true
            }
            None => false,
        }
    }
}

/// Timer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerOptions {
    /// Target ticks per second.
    pub fps: u32,
}

impl Default for TimerOptions {
    fn default() -> Self { Self { fps: 60 } }
}

impl TimerOptions {
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(ModelError::InvalidFrameRate(self.fps));
        }
        Ok(())
    }

    /// Minimum spacing between two ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

/// Frame-rate timer driven by the host loop calling [`FpsTimer::poll`].
///
/// Each dispatched tick reports the real time since the previous one, so a host
/// that polls late still hands the updater the correct frame length.
pub struct FpsTimer {
    options: TimerOptions,
    handler: HandlerSlot,
    running: Cell<bool>,
    last_tick: Cell<Option<Instant>>,
}

impl FpsTimer {
    pub fn new(options: TimerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, handler: HandlerSlot::default(), running: Cell::new(false), last_tick: Cell::new(None) })
    }

    pub fn options(&self) -> TimerOptions { self.options }

    /// Start measuring from `now` instead of the current instant.
    pub fn start_at(&self, now: Instant) {
        self.last_tick.set(Some(now));
        self.running.set(true);
    }

    /// Dispatch a tick if running and a full frame interval has passed since the last one.
    /// Returns whether a tick was dispatched.
    pub fn poll(&self, now: Instant) -> bool {
        if !self.running.get() {
            return false;
        }
        let Some(last) = self.last_tick.get() else {
            self.last_tick.set(Some(now));
            return false;
        };
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.options.frame_interval() {
            return false;
        }
        self.last_tick.set(Some(now));
        trace!(elapsed_us = elapsed.as_micros() as u64, "fps timer tick");
        self.handler.dispatch(elapsed)
    }

    /// Time left until the next tick is due, for hosts that sleep between polls.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last_tick.get() {
            Some(last) => self.options.frame_interval().saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

impl StopwatchTimer for FpsTimer {
    fn set_handler(&self, handler: Weak<dyn TickHandler>) { self.handler.set(handler) }
    fn start(&self) { self.start_at(Instant::now()) }
    fn stop(&self) { self.running.set(false) }
    fn is_running(&self) -> bool { self.running.get() }
}

/// Timer that only ticks when told to.
#[derive(Default)]
pub struct FakeTimer {
    handler: HandlerSlot,
    running: Cell<bool>,
}

impl FakeTimer {
    pub fn new() -> Self { Self::default() }

    /// Dispatch one tick of `elapsed` when running.
    pub fn tick(&self, elapsed: Duration) {
        if self.running.get() {
            self.handler.dispatch(elapsed);
        }
    }
}

impl StopwatchTimer for FakeTimer {
    fn set_handler(&self, handler: Weak<dyn TickHandler>) { self.handler.set(handler) }
    fn start(&self) { self.running.set(true) }
    fn stop(&self) { self.running.set(false) }
    fn is_running(&self) -> bool { self.running.get() }
}
