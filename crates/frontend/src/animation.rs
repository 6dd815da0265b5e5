use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::data::Controller;

/// Roughly one frame at 60Hz.
const FRAME_MS: u32 = 16;

/// Milliseconds from the page's high-resolution clock.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Advance the controller's animation until it finishes. A loop exits as soon
/// as a newer animation (or a gesture) bumps the generation, so only one loop
/// ever moves the transform.
pub fn run_frames(mut controller: Signal<Option<Controller>>) {
    let Some(generation) = controller.peek().as_ref().map(|c| c.animation_generation()) else {
        return;
    };
    spawn(async move {
        loop {
            let current = controller.peek().as_ref().map(|c| c.animation_generation());
            if current != Some(generation) {
                break;
            }
            let more = controller
                .write()
                .as_mut()
                .is_some_and(|ctl| ctl.tick(now_ms()));
            if !more {
                break;
            }
            TimeoutFuture::new(FRAME_MS).await;
        }
    });
}
