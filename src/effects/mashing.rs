//! Button mashing sequence
//!
//! The player keeps a value between two limits by pressing a button: every
//! press pushes the value up, time drains it back down. Reaching the upper
//! limit succeeds, falling to the lower limit fails. Either outcome is final.

use serde::{Deserialize, Serialize};

use super::emission::SequenceError;

/// Callback fired once when the sequence finishes.
pub type OutcomeCallback = Box<dyn FnMut()>;

/// Result of a mashing sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MashingOutcome {
    /// Still running
    #[default]
    Pending,
    /// Value reached the upper limit
    Succeeded,
    /// Value fell to the lower limit
    Failed,
}

impl MashingOutcome {
    /// Whether the sequence has finished
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Tuning for a mashing sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MashingConfig {
    /// Value added per press
    pub acceleration: f32,
    /// Value lost per second
    pub deceleration: f32,
    /// Failing limit
    pub min_limit: f32,
    /// Succeeding limit
    pub max_limit: f32,
}

impl Default for MashingConfig {
    fn default() -> Self {
        Self {
            acceleration: 0.1,
            deceleration: 0.25,
            min_limit: 0.0,
            max_limit: 1.0,
        }
    }
}

impl MashingConfig {
    /// Check rates and limits
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidValue`] for a negative or non-finite
    /// rate, or [`SequenceError::InvalidLimits`] unless `min_limit < max_limit`.
    pub fn validate(&self) -> Result<(), SequenceError> {
        for (field, value) in [
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SequenceError::InvalidValue { field, value });
            }
        }

        let limits_ok = self.min_limit.is_finite()
            && self.max_limit.is_finite()
            && self.min_limit < self.max_limit;
        if !limits_ok {
            return Err(SequenceError::InvalidLimits {
                min: self.min_limit,
                max: self.max_limit,
            });
        }

        Ok(())
    }

    fn midpoint(&self) -> f32 {
        (self.min_limit + self.max_limit) * 0.5
    }
}

/// A running mashing sequence.
pub struct ButtonMashing {
    config: MashingConfig,
    value: f32,
    outcome: MashingOutcome,
    presses: u32,
    on_success: Option<OutcomeCallback>,
    on_failure: Option<OutcomeCallback>,
}

impl ButtonMashing {
    /// Start a sequence with the value halfway between the limits.
    ///
    /// # Errors
    ///
    /// See [`MashingConfig::validate`].
    pub fn new(config: MashingConfig) -> Result<Self, SequenceError> {
        config.validate()?;

        Ok(Self {
            config,
            value: config.midpoint(),
            outcome: MashingOutcome::Pending,
            presses: 0,
            on_success: None,
            on_failure: None,
        })
    }

    /// Run `callback` once if the sequence succeeds.
    #[must_use]
    pub fn on_success(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Run `callback` once if the sequence fails.
    #[must_use]
    pub fn on_failure(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }

    /// Register a button press. Returns the outcome if this press finished the sequence.
    pub fn press(&mut self) -> Option<MashingOutcome> {
        if self.outcome.is_finished() {
            return None;
        }

        self.presses += 1;
        self.value += self.config.acceleration;
        self.settle()
    }

    /// Drain the value by `delta_time` seconds of deceleration.
    /// Returns the outcome if this tick finished the sequence.
    pub fn tick(&mut self, delta_time: f32) -> Option<MashingOutcome> {
        if self.outcome.is_finished() {
            return None;
        }
        if delta_time.is_nan() || delta_time < 0.0 {
            log::warn!("Ignoring invalid mashing delta {delta_time}");
            return None;
        }

        self.value -= self.config.deceleration * delta_time;
        self.settle()
    }

    /// Restart from the midpoint. Callbacks are kept.
    pub fn restart(&mut self) {
        self.value = self.config.midpoint();
        self.outcome = MashingOutcome::Pending;
        self.presses = 0;
    }

    fn settle(&mut self) -> Option<MashingOutcome> {
        let outcome = if self.value >= self.config.max_limit {
            MashingOutcome::Succeeded
        } else if self.value <= self.config.min_limit {
            MashingOutcome::Failed
        } else {
            return None;
        };

        self.value = self.value.clamp(self.config.min_limit, self.config.max_limit);
        self.outcome = outcome;
        log::debug!("Mashing finished: {outcome:?} after {} presses", self.presses);

        let callback = match outcome {
            MashingOutcome::Succeeded => self.on_success.as_mut(),
            _ => self.on_failure.as_mut(),
        };
        if let Some(callback) = callback {
            callback();
        }

        Some(outcome)
    }

    /// Value normalized over `[min_limit, max_limit]`
    #[must_use]
    pub fn progress(&self) -> f32 {
        crate::math::remap_to_unit(self.value, self.config.min_limit, self.config.max_limit)
            .clamp(0.0, 1.0)
    }

    #[must_use]
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[must_use]
    #[inline]
    pub fn outcome(&self) -> MashingOutcome {
        self.outcome
    }

    #[must_use]
    #[inline]
    pub fn presses(&self) -> u32 {
        self.presses
    }
}

impl std::fmt::Debug for ButtonMashing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ButtonMashing")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("outcome", &self.outcome)
            .field("presses", &self.presses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn config() -> MashingConfig {
        MashingConfig {
            acceleration: 0.25,
            deceleration: 0.5,
            min_limit: 0.0,
            max_limit: 1.0,
        }
    }

    #[test]
    fn test_starts_at_midpoint() {
        let mashing = ButtonMashing::new(config()).unwrap();

        assert_eq!(mashing.value(), 0.5);
        assert_eq!(mashing.progress(), 0.5);
        assert_eq!(mashing.outcome(), MashingOutcome::Pending);
    }

    #[test]
    fn test_presses_succeed() {
        let successes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&successes);
        let mut mashing = ButtonMashing::new(config())
            .unwrap()
            .on_success(move || counter.set(counter.get() + 1));

        assert_eq!(mashing.press(), None);
        assert_eq!(mashing.press(), Some(MashingOutcome::Succeeded));
        assert_eq!(mashing.progress(), 1.0);
        assert_eq!(successes.get(), 1);

        assert_eq!(mashing.press(), None);
        assert_eq!(successes.get(), 1);
    }

    #[test]
    fn test_idle_fails() {
        let failures = Rc::new(Cell::new(0));
        let counter = Rc::clone(&failures);
        let mut mashing = ButtonMashing::new(config())
            .unwrap()
            .on_failure(move || counter.set(counter.get() + 1));

        assert_eq!(mashing.tick(0.5), None);
        assert_eq!(mashing.value(), 0.25);
        assert_eq!(mashing.tick(0.5), Some(MashingOutcome::Failed));
        assert_eq!(mashing.progress(), 0.0);
        assert_eq!(failures.get(), 1);

        assert_eq!(mashing.tick(1.0), None);
        assert_eq!(mashing.press(), None);
        assert_eq!(failures.get(), 1);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut mashing = ButtonMashing::new(config()).unwrap();

        assert_eq!(mashing.tick(-1.0), None);
        assert_eq!(mashing.value(), 0.5);
    }

    #[test]
    fn test_restart() {
        let mut mashing = ButtonMashing::new(config()).unwrap();
        mashing.press();
        mashing.press();
        assert!(mashing.outcome().is_finished());

        mashing.restart();
        assert_eq!(mashing.outcome(), MashingOutcome::Pending);
        assert_eq!(mashing.presses(), 0);
        assert_eq!(mashing.value(), 0.5);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let result = ButtonMashing::new(MashingConfig {
            min_limit: 1.0,
            max_limit: 1.0,
            ..config()
        });

        assert_eq!(
            result.unwrap_err(),
            SequenceError::InvalidLimits { min: 1.0, max: 1.0 }
        );
    }
}
