//! Zoom/pan transform math.
//!
//! All functions are pure: they take the current [`Transform`] and return the
//! next one. Scale is always clamped to [`MIN_SCALE`, `MAX_SCALE`].

use crate::models::{Bounds, ScreenPoint, Transform};

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 8.0;

/// Fraction of the viewport a framed region may fill.
pub const FRAME_MARGIN: f64 = 0.9;

/// Clamp to the scale bound. Non-finite input collapses to [`MIN_SCALE`].
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        MIN_SCALE
    }
}

/// Transform that centers `bounds` in the viewport, scaled to fit with margin.
///
/// Degenerate boxes and empty viewports get scale 1. A box with non-finite
/// coordinates cannot be centered and yields the identity.
pub fn frame_region(bounds: Bounds, viewport_width: f64, viewport_height: f64) -> Transform {
    let finite = [bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y]
        .iter()
        .all(|v| v.is_finite());
    if !finite || !viewport_width.is_finite() || !viewport_height.is_finite() {
        return Transform::IDENTITY;
    }

    let scale = if bounds.is_degenerate() || viewport_width <= 0.0 || viewport_height <= 0.0 {
        MIN_SCALE
    } else {
        let fill = (bounds.width() / viewport_width).max(bounds.height() / viewport_height);
        if fill > 0.0 {
            clamp_scale(FRAME_MARGIN / fill)
        } else {
            MIN_SCALE
        }
    };

    let c = bounds.center();
    Transform::new(
        viewport_width / 2.0 - scale * c.x,
        viewport_height / 2.0 - scale * c.y,
        scale,
    )
}

pub fn reset_transform() -> Transform {
    Transform::IDENTITY
}

/// Translate by a screen-space drag delta.
pub fn pan(t: Transform, dx: f64, dy: f64) -> Transform {
    Transform::new(t.translate_x + dx, t.translate_y + dy, t.scale)
}

/// Set the scale to `scale` (clamped) keeping `anchor` over the same content point.
pub fn zoom_at(t: Transform, anchor: ScreenPoint, scale: f64) -> Transform {
    let new_scale = clamp_scale(scale);
    let content = t.invert(anchor);
    Transform::new(
        anchor.x - content.x * new_scale,
        anchor.y - content.y * new_scale,
        new_scale,
    )
}

/// Multiply the scale by `factor` around `anchor`.
pub fn zoom_by(t: Transform, anchor: ScreenPoint, factor: f64) -> Transform {
    zoom_at(t, anchor, t.scale * factor)
}

/// Keep the scaled content covering the viewport: translation stays within
/// `[-(size * scale - size), 0]` on each axis.
pub fn constrain_pan(t: Transform, viewport_width: f64, viewport_height: f64) -> Transform {
    let min_x = -(viewport_width * t.scale - viewport_width).max(0.0);
    let min_y = -(viewport_height * t.scale - viewport_height).max(0.0);
    Transform::new(
        t.translate_x.clamp(min_x, 0.0),
        t.translate_y.clamp(min_y, 0.0),
        t.scale,
    )
}
