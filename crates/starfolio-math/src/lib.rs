//! Math and timing primitives shared by every frame-stepped system:
//! transforms, easing curves, frame-rate-independent smoothing, and
//! periodic tickers.

pub mod easing;
pub mod smoothing;
pub mod ticker;
pub mod transform;

pub use easing::EasingFunction;
pub use smoothing::{clamp_dt, damp, damp_f32, frame_decay, smoothing_factor};
pub use ticker::{Throttle, Ticker};
pub use transform::Transform;
