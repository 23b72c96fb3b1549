// File: crates/adtui-model/tests/updater.rs
// Purpose: Validate tick phases, deferred registration, reset requests, timers and lerp.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use adtui_model::{
    FakeTimer, FpsTimer, SharedUpdatable, StopwatchTimer, TimerOptions, Updatable, Updater, ONE_SECOND,
};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn shared(name: &'static str, log: &Log) -> SharedUpdatable {
        Rc::new(Self { name, log: log.clone() })
    }
}

impl Updatable for Recorder {
    fn reset(&self) { self.log.borrow_mut().push(format!("{}.reset", self.name)) }
    fn update(&self, _elapsed: f32) { self.log.borrow_mut().push(format!("{}.update", self.name)) }
    fn post_update(&self) { self.log.borrow_mut().push(format!("{}.post", self.name)) }
}

/// Registers (or unregisters) another component during its own update.
struct Spawner {
    updater: Weak<Updater>,
    child: SharedUpdatable,
    remove: bool,
    fired: Cell<bool>,
}

impl Updatable for Spawner {
    fn update(&self, _elapsed: f32) {
        if self.fired.replace(true) {
            return;
        }
        if let Some(updater) = self.updater.upgrade() {
            if self.remove {
                updater.unregister(&self.child);
            } else {
                updater.register(self.child.clone());
            }
        }
    }
}

fn take(log: &Log) -> Vec<String> { std::mem::take(&mut *log.borrow_mut()) }

#[test]
fn step_runs_update_pass_then_post_update_pass() {
    let log: Log = Rc::default();
    let updater = Updater::detached();
    updater.register_all([Recorder::shared("a", &log), Recorder::shared("b", &log)]);

    updater.step(0.016);
    assert_eq!(take(&log), ["a.update", "b.update", "a.post", "b.post"]);
    assert!(!updater.is_stepping());
}

#[test]
fn reset_is_deferred_to_next_step_and_consumed() {
    let log: Log = Rc::default();
    let updater = Updater::detached();
    updater.register(Recorder::shared("a", &log));

    updater.reset();
    assert!(take(&log).is_empty());
    updater.step(0.0);
    assert_eq!(take(&log), ["a.reset", "a.update", "a.post"]);
    updater.step(0.0);
    assert_eq!(take(&log), ["a.update", "a.post"]);
}

#[test]
fn registration_during_step_waits_for_next_tick() {
    let log: Log = Rc::default();
    let updater = Rc::new(Updater::detached());
    let child = Recorder::shared("child", &log);
    updater.register(Rc::new(Spawner {
        updater: Rc::downgrade(&updater),
        child: child.clone(),
        remove: false,
        fired: Cell::new(false),
    }));

    updater.step(0.0);
    assert!(take(&log).is_empty());
    assert!(updater.is_registered(&child));

    updater.step(0.0);
    assert_eq!(take(&log), ["child.update", "child.post"]);
}

#[test]
fn unregistration_during_step_finishes_the_tick() {
    let log: Log = Rc::default();
    let updater = Rc::new(Updater::detached());
    let victim = Recorder::shared("victim", &log);
    updater.register(Rc::new(Spawner {
        updater: Rc::downgrade(&updater),
        child: victim.clone(),
        remove: true,
        fired: Cell::new(false),
    }));
    updater.register(victim.clone());

    updater.step(0.0);
    assert_eq!(take(&log), ["victim.update", "victim.post"]);
    assert!(!updater.is_registered(&victim));

    updater.step(0.0);
    assert!(take(&log).is_empty());
}

#[test]
fn remove_then_readd_in_same_tick_stays_registered() {
    struct Toggle {
        updater: Weak<Updater>,
        target: SharedUpdatable,
    }
    impl Updatable for Toggle {
        fn update(&self, _elapsed: f32) {
            let updater = self.updater.upgrade().expect("updater alive");
            updater.unregister(&self.target);
            updater.register(self.target.clone());
        }
    }

    let log: Log = Rc::default();
    let updater = Rc::new(Updater::detached());
    let target = Recorder::shared("t", &log);
    updater.register(target.clone());
    updater.register(Rc::new(Toggle { updater: Rc::downgrade(&updater), target: target.clone() }));

    updater.step(0.0);
    assert!(updater.is_registered(&target));
    assert_eq!(updater.component_count(), 2);
}

#[test]
fn unregister_outside_step_is_immediate() {
    let log: Log = Rc::default();
    let updater = Updater::detached();
    let a = Recorder::shared("a", &log);
    updater.register(a.clone());
    updater.register(a.clone());
    updater.unregister(&a);
    assert_eq!(updater.component_count(), 1);
}

#[test]
fn panicking_component_leaves_updater_usable() {
    struct Boom;
    impl Updatable for Boom {
        fn update(&self, _elapsed: f32) { panic!("boom") }
    }

    let updater = Updater::detached();
    let boom: SharedUpdatable = Rc::new(Boom);
    updater.register(boom.clone());
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| updater.step(0.0)));
    assert!(result.is_err());
    assert!(!updater.is_stepping());
    updater.unregister(&boom);
    assert_eq!(updater.component_count(), 0);
}

#[test]
fn fake_timer_drives_updater() {
    struct Elapsed(Cell<f32>);
    impl Updatable for Elapsed {
        fn update(&self, elapsed: f32) { self.0.set(self.0.get() + elapsed) }
    }

    let timer = Rc::new(FakeTimer::new());
    let updater = Updater::new(timer.clone());
    assert!(timer.is_running());
    assert!(updater.timer().is_some_and(|t| t.is_running()));
    assert!(Updater::detached().timer().is_none());
    let total = Rc::new(Elapsed(Cell::new(0.0)));
    updater.register(total.clone());

    timer.tick(ONE_SECOND / 2);
    timer.tick(ONE_SECOND / 2);
    assert!((total.0.get() - 1.0).abs() < 1e-6);

    timer.stop();
    timer.tick(ONE_SECOND);
    assert!((total.0.get() - 1.0).abs() < 1e-6);

    timer.start();
    drop(updater);
    assert!(!timer.is_running(), "dropping the updater stops its timer");
}

#[test]
fn fps_timer_ticks_once_per_frame_interval() {
    struct Ticks(Cell<u32>);
    impl Updatable for Ticks {
        fn update(&self, _elapsed: f32) { self.0.set(self.0.get() + 1) }
    }

    let timer = Rc::new(FpsTimer::new(TimerOptions { fps: 50 }).expect("valid options"));
    let updater = Updater::new(timer.clone());
    let ticks = Rc::new(Ticks(Cell::new(0)));
    updater.register(ticks.clone());

    let t0 = Instant::now();
    timer.start_at(t0);
    assert!(!timer.poll(t0 + Duration::from_millis(10)));
    assert!(timer.poll(t0 + Duration::from_millis(20)));
    assert!(!timer.poll(t0 + Duration::from_millis(30)));
    assert_eq!(timer.time_until_next(t0 + Duration::from_millis(30)), Duration::from_millis(10));
    assert!(timer.poll(t0 + Duration::from_millis(45)));
    assert_eq!(ticks.0.get(), 2);

    timer.stop();
    assert!(!timer.poll(t0 + Duration::from_secs(1)));
}

#[test]
fn lerp_moves_half_way_per_unit_frame() {
    assert_eq!(Updater::lerp(0.0, 10.0, 0.5, 1.0), 5.0);
    assert_eq!(Updater::lerp(0.0, 10.0, 0.5, 2.0), 7.5);
    assert_eq!(Updater::lerp_f32(0.0, 10.0, 0.5, 1.0), 5.0);
}

#[test]
fn lerp_is_framerate_independent() {
    let one_step = Updater::lerp(0.0, 100.0, 0.3, 1.0);
    let mut two_steps = Updater::lerp(0.0, 100.0, 0.3, 0.5);
    two_steps = Updater::lerp(two_steps, 100.0, 0.3, 0.5);
    assert!((one_step - two_steps).abs() < 1e-9);
}

#[test]
fn lerp_identity_and_threshold_snap() {
    assert_eq!(Updater::lerp(3.25, 3.25, 0.7, 0.016), 3.25);
    assert_eq!(Updater::lerp_f32(-1.5, -1.5, 0.7, 0.016), -1.5);
    assert_eq!(Updater::lerp_with_threshold(9.5, 10.0, 0.1, 0.016, 1.0), 10.0);
    assert_eq!(Updater::lerp_f32_with_threshold(9.5, 10.0, 0.1, 0.016, 1.0), 10.0);
    // Far from the target nothing snaps.
    assert!(Updater::lerp_with_threshold(0.0, 10.0, 0.1, 0.016, 1.0) < 1.0);
}
