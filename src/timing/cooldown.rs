//! Re-triggerable single-shot cooldown timer
//!
//! A cooldown is advanced explicitly by the host loop with the frame's delta
//! time. It never reads a clock on its own, so the same sequence of ticks
//! always produces the same result.
//!
//! # Example
//!
//! ```ignore
//! let mut cooldown = Cooldown::new(2.0, || log::info!("ready again"))?;
//!
//! cooldown.begin();
//! cooldown.tick(1.0); // progress 0.5, still active
//! cooldown.tick(1.0); // completes, callback fires once
//! ```

use std::fmt;

/// Completion callback invoked once per activation.
pub type CooldownCallback = Box<dyn FnMut()>;

/// A timer that blocks re-triggering of an effect until its duration elapses.
///
/// Lifecycle:
///
/// 1. `new()` - inactive, `elapsed == 0`
/// 2. `begin()` - active, `elapsed` reset to 0 (restarts if already active)
/// 3. `tick(dt)` - advances `elapsed`; on reaching `duration` deactivates and
///    fires the completion callback exactly once
pub struct Cooldown {
    /// Total duration in seconds
    duration: f32,
    /// Seconds elapsed since the last `begin()`, clamped to `duration`
    elapsed: f32,
    /// Whether the cooldown is currently running
    active: bool,
    /// Invoked when the cooldown completes
    on_complete: Option<CooldownCallback>,
}

impl Cooldown {
    /// Create an inactive cooldown with a completion callback.
    ///
    /// # Errors
    ///
    /// Returns [`CooldownError::InvalidDuration`] if `duration` is negative or NaN.
    pub fn new(duration: f32, on_complete: impl FnMut() + 'static) -> Result<Self, CooldownError> {
        let mut cooldown = Self::without_callback(duration)?;
        cooldown.on_complete = Some(Box::new(on_complete));
        Ok(cooldown)
    }

    /// Create an inactive cooldown whose owner polls the result of [`Cooldown::tick`].
    ///
    /// # Errors
    ///
    /// Returns [`CooldownError::InvalidDuration`] if `duration` is negative or NaN.
    pub fn without_callback(duration: f32) -> Result<Self, CooldownError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(CooldownError::InvalidDuration(duration));
        }

        Ok(Self {
            duration,
            elapsed: 0.0,
            active: false,
            on_complete: None,
        })
    }

    /// Start (or restart) the cooldown.
    pub fn begin(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Stop the cooldown without firing the completion callback.
    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Advance the cooldown by `delta_time` seconds.
    ///
    /// Returns `true` only on the tick that completes the cooldown. Ticks while
    /// inactive, and negative or NaN deltas, leave the state untouched.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if !self.active {
            return false;
        }

        if delta_time.is_nan() || delta_time < 0.0 {
            log::warn!("Ignoring invalid cooldown delta {delta_time}");
            return false;
        }

        self.elapsed += delta_time;

        if self.elapsed < self.duration {
            return false;
        }

        self.elapsed = self.duration;
        self.active = false;

        if let Some(on_complete) = self.on_complete.as_mut() {
            on_complete();
        }

        true
    }

    /// Normalized progress in `[0, 1]`. A zero-length cooldown is always complete.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration == 0.0 {
            return 1.0;
        }

        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Whether the cooldown is running.
    #[must_use]
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Total duration in seconds.
    #[must_use]
    #[inline]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds elapsed since the last `begin()`.
    #[must_use]
    #[inline]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds left before completion (0 when inactive).
    #[must_use]
    pub fn remaining(&self) -> f32 {
        if self.active {
            (self.duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }
}

impl fmt::Debug for Cooldown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cooldown")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("active", &self.active)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// Errors raised when constructing a cooldown
#[derive(Debug, Clone, PartialEq)]
pub enum CooldownError {
    /// Duration was negative, infinite or NaN
    InvalidDuration(f32),
}

impl fmt::Display for CooldownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration(d) => {
                write!(f, "Invalid argument: cooldown duration must be finite and >= 0, got {d}")
            }
        }
    }
}

impl std::error::Error for CooldownError {}
