//! Frame-rate-independent smoothing and damping.
//!
//! Every positional update in the galaxy goes through these helpers so that
//! motion feels the same at 30, 60 or 144 Hz.

use glam::Vec3;

/// Clamp a raw frame delta to `[0, max_dt]`.
///
/// Long stalls (tab switch, debugger pause) would otherwise produce one huge
/// integration step.
pub fn clamp_dt(raw_dt: f32, max_dt: f32) -> f32 {
    if raw_dt.is_finite() {
        raw_dt.clamp(0.0, max_dt)
    } else {
        0.0
    }
}

/// Blend factor for exponential smoothing at `rate` per second over `dt`.
///
/// Always in `[0, 1)`, and strictly positive when both `rate` and `dt` are.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

/// Move `current` toward `target` by the exponential blend for `rate` and `dt`.
pub fn damp(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, smoothing_factor(rate, dt))
}

/// Scalar counterpart of [`damp`].
pub fn damp_f32(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

/// Per-frame decay normalized to 60 Hz: `decay^(dt * 60)`.
///
/// A velocity multiplied by this each frame loses the same fraction per
/// second regardless of frame rate.
pub fn frame_decay(decay: f32, dt: f32) -> f32 {
    decay.powf(dt * 60.0)
}
