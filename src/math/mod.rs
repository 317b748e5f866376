//! Math helpers: easing curves, ranges, normalization and seeded randomness

mod easing;
mod range;
mod rng;

pub use easing::{Easing, arc, blend, ease_in, ease_in_out, ease_out, power, sigmoid};
pub use range::{FloatRange, IntRange};
pub use rng::GameRng;

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + t.clamp(0.0, 1.0) * (to - from)
}

/// Map `value` from `[min, max]` into `[0, 1]` (not clamped).
#[must_use]
pub fn remap_to_unit(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}
