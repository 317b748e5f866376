//! Easing curves over normalized time
//!
//! All curves take `t` in `[0, 1]` and are used to shape ramps such as the
//! light emission's growth and the mashing progress fed to animations.

use serde::{Deserialize, Serialize};

/// Named easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// `t` unchanged
    #[default]
    Linear,
    /// Slow start
    EaseIn,
    /// Slow end
    EaseOut,
    /// Slow start and end
    EaseInOut,
    /// Parabola peaking at `t = 0.5`
    Arc,
    /// Logistic curve
    Sigmoid,
}

impl Easing {
    /// Evaluate the curve at `t`
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseIn => ease_in(t, 2.0),
            Self::EaseOut => ease_out(t, 2.0),
            Self::EaseInOut => ease_in_out(t, 2.0),
            Self::Arc => arc(t),
            Self::Sigmoid => sigmoid(t),
        }
    }
}

/// `t` raised to `exponent` (`1` for exponent 0).
#[must_use]
pub fn ease_out(t: f32, exponent: f32) -> f32 {
    if exponent == 0.0 {
        1.0
    } else if exponent == 1.0 {
        t
    } else {
        power(t, exponent)
    }
}

/// Mirror of [`ease_out`] around `t = 1`.
#[must_use]
pub fn ease_in(t: f32, exponent: f32) -> f32 {
    1.0 - ease_out(t - 1.0, exponent).abs()
}

/// Blend from ease-in to ease-out as `t` advances.
#[must_use]
pub fn ease_in_out(t: f32, exponent: f32) -> f32 {
    blend(ease_in(t, exponent), ease_out(t, exponent), t)
}

/// `a + weight_b * (b - a)`
#[must_use]
pub fn blend(a: f32, b: f32, weight_b: f32) -> f32 {
    a + weight_b * (b - a)
}

/// Fractional power approximated by blending the two surrounding integer powers.
#[must_use]
pub fn power(x: f32, p: f32) -> f32 {
    if p == 0.0 {
        return if x != 0.0 { 1.0 } else { 0.0 };
    }
    if p == 1.0 {
        return x;
    }

    let whole = p.trunc();
    let fraction = p - whole;
    let result = x.powi(whole as i32);

    if fraction > 0.0 {
        blend(result, result * x, fraction)
    } else {
        result
    }
}

/// `t * (1 - t)`
#[must_use]
pub fn arc(t: f32) -> f32 {
    t * (1.0 - t)
}

/// Logistic function `1 / (1 + e^-x)`
#[must_use]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!(close(easing.apply(0.0), 0.0), "{easing:?} at 0");
            assert!(close(easing.apply(1.0), 1.0), "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_shapes() {
        assert!(close(ease_out(0.5, 2.0), 0.25));
        assert!(close(ease_in(0.5, 2.0), 0.75));
        assert!(ease_in(0.25, 2.0) > 0.25);
    }

    #[test]
    fn test_power_fractional() {
        assert!(close(power(2.0, 2.0), 4.0));
        assert!(close(power(2.0, 2.5), 6.0));
        assert_eq!(power(0.0, 0.0), 0.0);
        assert_eq!(power(3.0, 0.0), 1.0);
    }

    #[test]
    fn test_arc_and_sigmoid() {
        assert!(close(arc(0.5), 0.25));
        assert!(close(sigmoid(0.0), 0.5));
        assert!(sigmoid(10.0) > 0.99);
    }
}
