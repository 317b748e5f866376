//! Hit points with an invincibility window after damage

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timing::{Cooldown, CooldownError};

/// Something that happened to a [`Health`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HealthEvent {
    /// Damage taken, hp still above 0
    Depleted {
        /// Damage applied
        amount: f32,
    },
    /// Healed, hp still below max
    Replenished {
        /// Hp restored
        amount: f32,
    },
    /// The invincibility window lapsed
    InvincibilityEnds,
    /// Damage taken, hp reached 0
    FullyDepleted {
        /// Damage applied
        amount: f32,
    },
    /// Healed back to max
    FullyReplenished {
        /// Hp restored
        amount: f32,
    },
}

/// Health tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    pub max_hp: f32,
    /// Seconds of invincibility after a hit (0 disables it)
    pub invincibility_duration: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_hp: 3.0,
            invincibility_duration: 1.5,
        }
    }
}

/// Current and maximum hp plus the invincibility cooldown.
#[derive(Debug)]
pub struct Health {
    max_hp: f32,
    hp: f32,
    invincibility: Cooldown,
}

impl Health {
    /// Create a health container at full hp.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidMaxHp`] unless `max_hp` is finite and
    /// above 0, or [`HealthError::InvalidInvincibility`] for a bad duration.
    pub fn new(config: HealthConfig) -> Result<Self, HealthError> {
        validate_max_hp(config.max_hp)?;
        let invincibility = Cooldown::without_callback(config.invincibility_duration)
            .map_err(HealthError::InvalidInvincibility)?;

        Ok(Self {
            max_hp: config.max_hp,
            hp: config.max_hp,
            invincibility,
        })
    }

    /// Apply damage.
    ///
    /// Ignored while invincible, once hp is 0, or when `amount <= 0`. Damage is
    /// clamped to the remaining hp. Starts invincibility if requested and the
    /// window is non-zero.
    pub fn give_damage(&mut self, amount: f32, apply_invincibility: bool) -> Option<HealthEvent> {
        if self.is_invincible() || self.is_depleted() || amount.is_nan() || amount <= 0.0 {
            return None;
        }

        let amount = amount.min(self.hp);
        self.hp -= amount;

        let event = if self.hp > 0.0 {
            HealthEvent::Depleted { amount }
        } else {
            self.hp = 0.0;
            HealthEvent::FullyDepleted { amount }
        };

        if apply_invincibility && self.invincibility.duration() > 0.0 {
            self.invincibility.begin();
        }

        log::debug!("Health {:.2}/{:.2} after {event:?}", self.hp, self.max_hp);
        Some(event)
    }

    /// Restore hp, clamped to the missing amount. Ignored at full hp or when `amount <= 0`.
    pub fn replenish(&mut self, amount: f32) -> Option<HealthEvent> {
        if self.hp >= self.max_hp || amount.is_nan() || amount <= 0.0 {
            return None;
        }

        let amount = amount.min(self.max_hp - self.hp);
        self.hp += amount;

        let event = if self.hp < self.max_hp {
            HealthEvent::Replenished { amount }
        } else {
            self.hp = self.max_hp;
            HealthEvent::FullyReplenished { amount }
        };

        Some(event)
    }

    /// Advance the invincibility window.
    pub fn tick(&mut self, delta_time: f32) -> Option<HealthEvent> {
        self.invincibility
            .tick(delta_time)
            .then_some(HealthEvent::InvincibilityEnds)
    }

    /// Back to full hp with no invincibility.
    ///
    /// Reports [`HealthEvent::InvincibilityEnds`] if a window was cut short.
    pub fn reset(&mut self) -> Option<HealthEvent> {
        let was_invincible = self.is_invincible();
        self.invincibility.cancel();
        self.hp = self.max_hp;

        was_invincible.then_some(HealthEvent::InvincibilityEnds)
    }

    /// Change the maximum hp, optionally resetting to it.
    ///
    /// Without a reset, current hp is clamped to the new maximum.
    ///
    /// # Errors
    ///
    /// Returns [`HealthError::InvalidMaxHp`] unless `max_hp` is finite and above 0.
    pub fn set_max_hp(&mut self, max_hp: f32, reset: bool) -> Result<(), HealthError> {
        validate_max_hp(max_hp)?;
        self.max_hp = max_hp;

        if reset {
            self.reset();
        } else {
            self.hp = self.hp.min(max_hp);
        }

        Ok(())
    }

    #[must_use]
    #[inline]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    #[must_use]
    #[inline]
    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// `hp / max_hp`
    #[must_use]
    #[inline]
    pub fn hp_ratio(&self) -> f32 {
        self.hp / self.max_hp
    }

    #[must_use]
    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    #[must_use]
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    /// Progress through the current invincibility window
    #[must_use]
    pub fn invincibility_progress(&self) -> f32 {
        self.invincibility.progress()
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HP {}/{} (invincible: {})",
            self.hp,
            self.max_hp,
            self.is_invincible()
        )
    }
}

fn validate_max_hp(max_hp: f32) -> Result<(), HealthError> {
    if max_hp.is_finite() && max_hp > 0.0 {
        Ok(())
    } else {
        Err(HealthError::InvalidMaxHp(max_hp))
    }
}

/// Errors raised when configuring [`Health`]
#[derive(Debug, Clone, PartialEq)]
pub enum HealthError {
    /// Maximum hp was not a positive finite number
    InvalidMaxHp(f32),
    /// Invincibility duration was rejected
    InvalidInvincibility(CooldownError),
}

impl fmt::Display for HealthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaxHp(value) => {
                write!(f, "Invalid argument: max hp must be > 0, got {value}")
            }
            Self::InvalidInvincibility(e) => write!(f, "Invincibility: {e}"),
        }
    }
}

impl std::error::Error for HealthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInvincibility(e) => Some(e),
            Self::InvalidMaxHp(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health() -> Health {
        Health::new(HealthConfig {
            max_hp: 3.0,
            invincibility_duration: 1.0,
        })
        .unwrap()
    }

    #[test]
    fn test_starts_full() {
        let health = health();

        assert_eq!(health.hp(), 3.0);
        assert_eq!(health.hp_ratio(), 1.0);
        assert!(!health.is_invincible());
    }

    #[test]
    fn test_damage_starts_invincibility() {
        let mut health = health();

        assert_eq!(
            health.give_damage(1.0, true),
            Some(HealthEvent::Depleted { amount: 1.0 })
        );
        assert!(health.is_invincible());

        assert_eq!(health.give_damage(1.0, true), None, "invincible");
        assert_eq!(health.hp(), 2.0);

        assert_eq!(health.tick(0.5), None);
        assert_eq!(health.invincibility_progress(), 0.5);
        assert_eq!(health.tick(0.5), Some(HealthEvent::InvincibilityEnds));
        assert!(!health.is_invincible());
    }

    #[test]
    fn test_damage_clamped_to_hp() {
        let mut health = health();

        assert_eq!(
            health.give_damage(10.0, false),
            Some(HealthEvent::FullyDepleted { amount: 3.0 })
        );
        assert_eq!(health.hp(), 0.0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_non_positive_damage_ignored() {
        let mut health = health();

        assert_eq!(health.give_damage(0.0, true), None);
        assert_eq!(health.give_damage(-2.0, true), None);
        assert!(!health.is_invincible());
    }

    #[test]
    fn test_replenish() {
        let mut health = health();
        health.give_damage(2.0, false);

        assert_eq!(
            health.replenish(0.5),
            Some(HealthEvent::Replenished { amount: 0.5 })
        );
        assert_eq!(
            health.replenish(5.0),
            Some(HealthEvent::FullyReplenished { amount: 1.5 })
        );
        assert_eq!(health.hp(), 3.0);
        assert_eq!(health.replenish(-1.0), None);
    }

    #[test]
    fn test_no_events_for_zero_change() {
        let mut health = health();

        assert_eq!(health.replenish(1.0), None, "already full");

        health.give_damage(3.0, false);
        assert_eq!(health.give_damage(1.0, true), None, "already depleted");
        assert!(!health.is_invincible());
        assert_eq!(health.hp(), 0.0);
    }

    #[test]
    fn test_reset_cuts_invincibility() {
        let mut health = health();
        health.give_damage(1.0, true);

        assert_eq!(health.reset(), Some(HealthEvent::InvincibilityEnds));
        assert_eq!(health.hp(), 3.0);
        assert!(!health.is_invincible());
        assert_eq!(health.reset(), None);
    }

    #[test]
    fn test_set_max_hp() {
        let mut health = health();

        health.set_max_hp(2.0, false).unwrap();
        assert_eq!(health.hp(), 2.0);

        health.give_damage(1.0, false);
        health.set_max_hp(5.0, true).unwrap();
        assert_eq!(health.hp(), 5.0);

        assert_eq!(
            health.set_max_hp(0.0, true),
            Err(HealthError::InvalidMaxHp(0.0))
        );
    }

    #[test]
    fn test_zero_invincibility_never_blocks() {
        let mut health = Health::new(HealthConfig {
            max_hp: 2.0,
            invincibility_duration: 0.0,
        })
        .unwrap();

        health.give_damage(1.0, true);
        assert!(!health.is_invincible());
        assert_eq!(
            health.give_damage(1.0, true),
            Some(HealthEvent::FullyDepleted { amount: 1.0 })
        );
    }
}
