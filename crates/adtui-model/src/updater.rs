// File: crates/adtui-model/src/updater.rs
// Summary: Fixed-tick update loop over registered components, plus frame-rate independent lerp.
// Notes:
// - A step runs reset (when requested), then update on every component, then
//   post_update on every component, both in registration order.
// - The active set never changes during a step. Register/unregister calls made
//   from inside a step are queued and applied once the step finishes,
//   unregistrations first, so remove-then-re-add within one tick leaves the
//   component registered.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::timer::{StopwatchTimer, TickHandler};

/// A component stepped once per tick.
///
/// Methods take `&self`; components keep their mutable state in cells.
pub trait Updatable {
    /// Snap to the final state, skipping any animation in progress.
    fn reset(&self) {}
    fn update(&self, elapsed_secs: f32);
    /// Runs after every component has finished `update` for this tick.
    fn post_update(&self) {}
}

pub type SharedUpdatable = Rc<dyn Updatable>;

fn same_component(a: &SharedUpdatable, b: &SharedUpdatable) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Restores the stepping flag even when a component panics mid-step.
struct SteppingGuard<'a>(&'a Cell<bool>);

impl<'a> SteppingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for SteppingGuard<'_> {
    fn drop(&mut self) { self.0.set(false) }
}

pub struct Updater {
    timer: Option<Rc<dyn StopwatchTimer>>,
    components: RefCell<Vec<SharedUpdatable>>,
    to_register: RefCell<Vec<SharedUpdatable>>,
    to_unregister: RefCell<Vec<SharedUpdatable>>,
    stepping: Cell<bool>,
    reset: Cell<bool>,
}

impl Updater {
    /// Create an updater driven by `timer`. The updater installs itself as the
    /// timer's handler and starts it.
    pub fn new(timer: Rc<dyn StopwatchTimer>) -> Rc<Self> {
        let updater = Rc::new(Self::with_timer(Some(timer.clone())));
        let handler: std::rc::Weak<dyn TickHandler> = Rc::downgrade(&updater) as std::rc::Weak<dyn TickHandler>;
        timer.set_handler(handler);
        timer.start();
        updater
    }

    /// An updater without a timer; the host calls [`Updater::step`] or
    /// [`TickHandler::on_tick`] itself.
    pub fn detached() -> Self { Self::with_timer(None) }

    fn with_timer(timer: Option<Rc<dyn StopwatchTimer>>) -> Self {
        Self {
            timer,
            components: RefCell::new(Vec::new()),
            to_register: RefCell::new(Vec::new()),
            to_unregister: RefCell::new(Vec::new()),
            stepping: Cell::new(false),
            reset: Cell::new(false),
        }
    }

    pub fn timer(&self) -> Option<&Rc<dyn StopwatchTimer>> { self.timer.as_ref() }

    pub fn is_stepping(&self) -> bool { self.stepping.get() }

    /// Number of active components (pending registrations excluded).
    pub fn component_count(&self) -> usize { self.components.borrow().len() }

    pub fn is_registered(&self, updatable: &SharedUpdatable) -> bool {
        self.components.borrow().iter().any(|c| same_component(c, updatable))
    }

    /// No de-duplication: registering twice steps the component twice per tick.
    pub fn register(&self, updatable: SharedUpdatable) {
        if self.stepping.get() {
            self.to_register.borrow_mut().push(updatable);
        } else {
            self.components.borrow_mut().push(updatable);
        }
    }

    pub fn register_all(&self, updatables: impl IntoIterator<Item = SharedUpdatable>) {
        for updatable in updatables {
            self.register(updatable);
        }
    }

    /// Removes the first matching registration.
    pub fn unregister(&self, updatable: &SharedUpdatable) {
        if self.stepping.get() {
            self.to_unregister.borrow_mut().push(updatable.clone());
        } else {
            remove_first(&mut self.components.borrow_mut(), updatable);
        }
    }

    /// Request that every component be reset at the start of the next step.
    pub fn reset(&self) { self.reset.set(true) }

    pub fn step(&self, frame_length: f32) {
        {
            let _stepping = SteppingGuard::enter(&self.stepping);
            let components = self.components.borrow();
            trace!(frame_length, components = components.len(), "updater step");
            if self.reset.replace(false) {
                for component in components.iter() {
                    component.reset();
                }
            }
            for component in components.iter() {
                component.update(frame_length);
            }
            for component in components.iter() {
                component.post_update();
            }
        }
        self.apply_pending();
    }

    fn apply_pending(&self) {
        let unregister = std::mem::take(&mut *self.to_unregister.borrow_mut());
        let register = std::mem::take(&mut *self.to_register.borrow_mut());
        if unregister.is_empty() && register.is_empty() {
            return;
        }
        trace!(unregistered = unregister.len(), registered = register.len(), "applying deferred registrations");
        let mut components = self.components.borrow_mut();
        for updatable in &unregister {
            remove_first(&mut components, updatable);
        }
        components.extend(register);
    }

    /// Exponential approach of `from` toward `to`; see [`Updater::lerp_with_threshold`].
    pub fn lerp(from: f64, to: f64, fraction: f64, frame_length: f32) -> f64 {
        Self::lerp_with_threshold(from, to, fraction, frame_length, 0.0)
    }

    /// Move `from` toward `to` so that `fraction` of the remaining distance is covered
    /// per unit of `frame_length`, independent of how often it is called.
    /// Snaps to `to` once the distance drops below `threshold`.
    pub fn lerp_with_threshold(from: f64, to: f64, fraction: f64, frame_length: f32, threshold: f32) -> f64 {
        let threshold = f64::from(threshold);
        if (to - from).abs() < threshold {
            return to;
        }
        let q = (1.0 - fraction).powf(f64::from(frame_length));
        let value = from + (to - from) * (1.0 - q);
        if (to - value).abs() < threshold { to } else { value }
    }

    pub fn lerp_f32(from: f32, to: f32, fraction: f32, frame_length: f32) -> f32 {
        Self::lerp_f32_with_threshold(from, to, fraction, frame_length, 0.0)
    }

    pub fn lerp_f32_with_threshold(from: f32, to: f32, fraction: f32, frame_length: f32, threshold: f32) -> f32 {
        if (to - from).abs() < threshold {
            return to;
        }
        let q = (1.0 - fraction).powf(frame_length);
        let value = from + (to - from) * (1.0 - q);
        if (to - value).abs() < threshold { to } else { value }
    }
}

impl TickHandler for Updater {
    fn on_tick(&self, elapsed: Duration) {
        self.step(elapsed.as_secs_f32());
    }
}

impl Drop for Updater {
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.stop();
        }
    }
}

fn remove_first(components: &mut Vec<SharedUpdatable>, updatable: &SharedUpdatable) {
    if let Some(index) = components.iter().position(|c| same_component(c, updatable)) {
        components.remove(index);
    }
}
