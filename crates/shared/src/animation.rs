//! Transform animation on a single timeline.
//!
//! Time is passed in explicitly (milliseconds), so the animator works with any
//! frame source and is fully testable. Starting a new animation replaces the
//! running one and bumps the generation; frame loops bound to an older
//! generation must stop.

use crate::models::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Componentwise interpolation between two transforms.
pub fn lerp(from: Transform, to: Transform, t: f64) -> Transform {
    Transform::new(
        from.translate_x + (to.translate_x - from.translate_x) * t,
        from.translate_y + (to.translate_y - from.translate_y) * t,
        from.scale + (to.scale - from.scale) * t,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Transform,
    pub to: Transform,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    /// Linear progress at `now_ms`, in [0, 1].
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    pub fn sample(&self, now_ms: f64) -> Transform {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            // Exact target, no float drift
            return self.to;
        }
        lerp(self.from, self.to, self.easing.apply(p))
    }
}

/// At most one running tween; later requests supersede earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    active: Option<Tween>,
    generation: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `from` → `to`, replacing any running tween.
    /// Returns the new generation.
    pub fn animate(
        &mut self,
        from: Transform,
        to: Transform,
        duration_ms: f64,
        easing: Easing,
        now_ms: f64,
    ) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.active = Some(Tween {
            from,
            to,
            start_ms: now_ms,
            duration_ms,
            easing,
        });
        tracing::debug!(generation = self.generation, duration_ms, "Animation started");
        self.generation
    }

    /// Drop the running tween, if any. Loops on the old generation will exit.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn target(&self) -> Option<Transform> {
        self.active.map(|t| t.to)
    }

    /// Sample the running tween and hand the value to `on_frame`.
    /// Returns `true` while more frames are needed.
    pub fn frame(&mut self, now_ms: f64, on_frame: impl FnOnce(Transform)) -> bool {
        let Some(tween) = self.active else {
            return false;
        };
        on_frame(tween.sample(now_ms));
        if tween.is_finished(now_ms) {
            self.active = None;
            false
        } else {
            true
        }
    }
}
