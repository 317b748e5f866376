//! Inclusive numeric ranges sampled by the spawner

use serde::{Deserialize, Serialize};

use super::GameRng;

/// Inclusive `[min, max]` range of floats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl FloatRange {
    /// Create a range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max` and both bounds are finite
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Uniform sample from the range
    pub fn sample(&self, rng: &mut GameRng) -> f32 {
        rng.range_f32(self.min, self.max)
    }

    /// Midpoint of the range
    #[must_use]
    pub fn median(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// Where `value` sits inside the range, as a fraction (not clamped)
    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        super::remap_to_unit(value, self.min, self.max)
    }

    /// Clamp a value into the range
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Inclusive `[min, max]` range of integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    /// Lower bound
    pub min: i32,
    /// Upper bound
    pub max: i32,
}

impl IntRange {
    /// Create a range
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max`
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Uniform sample from the range
    pub fn sample(&self, rng: &mut GameRng) -> i32 {
        rng.range_i32(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_range_validity() {
        assert!(FloatRange::new(1.0, 2.0).is_valid());
        assert!(FloatRange::new(2.0, 2.0).is_valid());
        assert!(!FloatRange::new(3.0, 2.0).is_valid());
        assert!(!FloatRange::new(f32::NAN, 2.0).is_valid());
    }

    #[test]
    fn test_float_range_normalize() {
        let range = FloatRange::new(-1.0, 1.0);

        assert_eq!(range.normalize(0.0), 0.5);
        assert_eq!(range.normalize(1.0), 1.0);
        assert_eq!(range.median(), 0.0);
    }

    #[test]
    fn test_int_range_sample() {
        let mut rng = GameRng::from_seed(11);
        let range = IntRange::new(3, 5);

        for _ in 0..32 {
            assert!((3..=5).contains(&range.sample(&mut rng)));
        }
    }
}
