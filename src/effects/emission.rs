//! Light emission pulse
//!
//! A triggered pulse grows the light's range from 0 to its radius, holds it,
//! shrinks it back to 0 and then blocks re-triggering for a cooldown:
//!
//! ```text
//! Idle --trigger--> RampingUp --> Holding --> RampingDown --> Cooldown --> Idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fsm::{State, StateMachine, Transition};
use crate::math::{Easing, lerp};
use crate::timing::Cooldown;

/// Phase of the emission sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmissionPhase {
    /// Waiting for a trigger
    #[default]
    Idle,
    /// Range growing towards the radius
    RampingUp,
    /// Range held at the radius
    Holding,
    /// Range shrinking back to 0
    RampingDown,
    /// Emission finished, re-trigger blocked
    Cooldown,
}

impl EmissionPhase {
    /// Whether light is being emitted in this phase
    #[must_use]
    pub const fn is_emitting(self) -> bool {
        matches!(self, Self::RampingUp | Self::Holding | Self::RampingDown)
    }
}

/// Timing and size of an emission pulse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionConfig {
    /// Range reached at the pulse's peak
    pub radius: f32,
    /// Seconds to grow from 0 to `radius`
    pub ramp_up: f32,
    /// Seconds held at `radius`
    pub hold: f32,
    /// Seconds to shrink from `radius` to 0
    pub ramp_down: f32,
    /// Seconds before another pulse may start
    pub cooldown: f32,
    /// Shape of both ramps
    #[serde(default)]
    pub curve: Easing,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            ramp_up: 0.5,
            hold: 0.25,
            ramp_down: 1.0,
            cooldown: 3.0,
            curve: Easing::Linear,
        }
    }
}

impl EmissionConfig {
    /// Check every duration and the radius
    ///
    /// # Errors
    ///
    /// Returns the first field that is negative or not finite.
    pub fn validate(&self) -> Result<(), SequenceError> {
        let fields = [
            ("radius", self.radius),
            ("ramp_up", self.ramp_up),
            ("hold", self.hold),
            ("ramp_down", self.ramp_down),
            ("cooldown", self.cooldown),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SequenceError::InvalidValue { field, value });
            }
        }

        Ok(())
    }
}

// ============================================================================
// States
// ============================================================================

#[derive(Debug)]
struct EmissionContext {
    config: EmissionConfig,
    delta_time: f32,
    triggered: bool,
    range: f32,
    phase: EmissionPhase,
    cooldown: Cooldown,
}

/// Fraction of `duration` covered by `elapsed`; zero-length phases are complete.
fn phase_fraction(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).min(1.0)
    }
}

#[derive(Debug)]
struct Idle;

impl State<EmissionContext> for Idle {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn enter(&mut self, ctx: &mut EmissionContext) {
        ctx.phase = EmissionPhase::Idle;
        ctx.range = 0.0;
    }

    fn update(&mut self, ctx: &mut EmissionContext) -> Transition<EmissionContext> {
        if ctx.triggered {
            Transition::to(RampingUp { elapsed: 0.0 })
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
struct RampingUp {
    elapsed: f32,
}

impl State<EmissionContext> for RampingUp {
    fn name(&self) -> &'static str {
        "RampingUp"
    }

    fn enter(&mut self, ctx: &mut EmissionContext) {
        ctx.phase = EmissionPhase::RampingUp;
        ctx.range = 0.0;
    }

    fn update(&mut self, ctx: &mut EmissionContext) -> Transition<EmissionContext> {
        self.elapsed += ctx.delta_time;
        let t = phase_fraction(self.elapsed, ctx.config.ramp_up);
        ctx.range = lerp(0.0, ctx.config.radius, ctx.config.curve.apply(t));

        if t >= 1.0 {
            Transition::to(Holding { elapsed: 0.0 })
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
struct Holding {
    elapsed: f32,
}

impl State<EmissionContext> for Holding {
    fn name(&self) -> &'static str {
        "Holding"
    }

    fn enter(&mut self, ctx: &mut EmissionContext) {
        ctx.phase = EmissionPhase::Holding;
        ctx.range = ctx.config.radius;
    }

    fn update(&mut self, ctx: &mut EmissionContext) -> Transition<EmissionContext> {
        self.elapsed += ctx.delta_time;

        if self.elapsed >= ctx.config.hold {
            Transition::to(RampingDown { elapsed: 0.0 })
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
struct RampingDown {
    elapsed: f32,
}

impl State<EmissionContext> for RampingDown {
    fn name(&self) -> &'static str {
        "RampingDown"
    }

    fn enter(&mut self, ctx: &mut EmissionContext) {
        ctx.phase = EmissionPhase::RampingDown;
        ctx.range = ctx.config.radius;
    }

    fn update(&mut self, ctx: &mut EmissionContext) -> Transition<EmissionContext> {
        self.elapsed += ctx.delta_time;
        let t = phase_fraction(self.elapsed, ctx.config.ramp_down);
        ctx.range = lerp(ctx.config.radius, 0.0, ctx.config.curve.apply(t));

        if t >= 1.0 {
            Transition::to(CoolingDown)
        } else {
            Transition::None
        }
    }
}

#[derive(Debug)]
struct CoolingDown;

impl State<EmissionContext> for CoolingDown {
    fn name(&self) -> &'static str {
        "Cooldown"
    }

    fn enter(&mut self, ctx: &mut EmissionContext) {
        ctx.phase = EmissionPhase::Cooldown;
        ctx.range = 0.0;
        ctx.cooldown.begin();
    }

    fn update(&mut self, ctx: &mut EmissionContext) -> Transition<EmissionContext> {
        if ctx.cooldown.tick(ctx.delta_time) {
            Transition::to(Idle)
        } else {
            Transition::None
        }
    }
}

// ============================================================================
// Light Emission
// ============================================================================

/// Triggerable light pulse advanced by the host loop.
#[derive(Debug)]
pub struct LightEmission {
    machine: StateMachine<EmissionContext>,
    ctx: EmissionContext,
}

impl LightEmission {
    /// Create an idle emission.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::InvalidValue`] for a negative or non-finite field.
    pub fn new(config: EmissionConfig) -> Result<Self, SequenceError> {
        config.validate()?;

        let cooldown = Cooldown::without_callback(config.cooldown)
            .map_err(|_| SequenceError::InvalidValue {
                field: "cooldown",
                value: config.cooldown,
            })?;

        Ok(Self {
            machine: StateMachine::new(Idle),
            ctx: EmissionContext {
                config,
                delta_time: 0.0,
                triggered: false,
                range: 0.0,
                phase: EmissionPhase::Idle,
                cooldown,
            },
        })
    }

    /// Request a pulse. Accepted only while idle; the pulse starts on the next tick.
    pub fn trigger(&mut self) -> bool {
        if self.ctx.phase != EmissionPhase::Idle {
            return false;
        }

        self.ctx.triggered = true;
        true
    }

    /// Advance by `delta_time` seconds. Returns the new phase if it changed.
    pub fn tick(&mut self, delta_time: f32) -> Option<EmissionPhase> {
        if delta_time.is_nan() || delta_time < 0.0 {
            log::warn!("Ignoring invalid emission delta {delta_time}");
            return None;
        }

        let before = self.ctx.phase;
        self.ctx.delta_time = delta_time;
        self.machine.update(&mut self.ctx);
        self.ctx.triggered = false;

        let after = self.ctx.phase;
        if after == before {
            return None;
        }

        log::debug!("Light emission {before:?} -> {after:?}");
        Some(after)
    }

    /// Cut any running pulse short and return to idle without waiting out the cooldown.
    ///
    /// Returns the phase that was interrupted, or `None` if already idle.
    pub fn reset(&mut self) -> Option<EmissionPhase> {
        self.ctx.triggered = false;
        if self.machine.is_in_state("Idle") {
            return None;
        }

        let before = self.ctx.phase;
        log::debug!("Light emission reset from {}", self.machine.current_state_name());
        self.ctx.cooldown.cancel();
        self.machine.transition(&mut self.ctx, Idle);
        Some(before)
    }

    /// Current light range
    #[must_use]
    pub fn range(&self) -> f32 {
        self.ctx.range
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> EmissionPhase {
        self.ctx.phase
    }

    /// Whether light is being emitted
    #[must_use]
    pub fn is_emitting(&self) -> bool {
        self.ctx.phase.is_emitting()
    }

    /// Progress through the post-emission cooldown
    #[must_use]
    pub fn cooldown_progress(&self) -> f32 {
        self.ctx.cooldown.progress()
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &EmissionConfig {
        &self.ctx.config
    }
}

/// Errors raised when configuring a timed sequence
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// A duration, rate or size was negative or not finite
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// The lower limit was not below the upper limit
    InvalidLimits {
        /// Lower limit
        min: f32,
        /// Upper limit
        max: f32,
    },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, value } => {
                write!(f, "Invalid argument: {field} must be finite and >= 0, got {value}")
            }
            Self::InvalidLimits { min, max } => {
                write!(f, "Invalid argument: min limit {min} must be below max limit {max}")
            }
        }
    }
}

impl std::error::Error for SequenceError {}
