// File: crates/model-examples/src/bin/animated_range.rs
// Summary: Minimal example that eases a range toward a target with a fake timer and prints each frame.

use std::rc::Rc;

use adtui_model::{AnimatedRange, AnimatedRangeOptions, FakeTimer, Range, Updater, ONE_SECOND};

fn main() -> adtui_model::Result<()> {
    let range = Range::shared(0.0, 10.0);
    let animated = Rc::new(AnimatedRange::new(range.clone(), AnimatedRangeOptions::default())?);

    let timer = Rc::new(FakeTimer::new());
    let updater = Updater::new(timer.clone());
    updater.register(animated.clone());

    animated.animate_to(100.0, 150.0);
    let frame = ONE_SECOND / 30;
    let mut n = 0;
    while animated.is_animating() {
        timer.tick(frame);
        n += 1;
        println!("frame {n:3}: [{:.3}, {:.3}]", range.min(), range.max());
    }
    println!("Settled after {n} frames");
    Ok(())
}
