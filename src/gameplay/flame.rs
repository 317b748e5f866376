//! The player's flame: movement down the pit, radius clamp and its light

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::Transform;
use crate::effects::{EmissionConfig, EmissionPhase, LightEmission, SequenceError};

/// Flame tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlameConfig {
    /// Units per second: `x` sideways, `y` forward along the flame's up, `z` vertical on screen
    pub speed: Vec3,
    /// Angular speed of the idle light flicker
    pub oscillation_speed: f32,
    /// Radius of the flame's collision sphere
    pub collider_radius: f32,
    /// Radius of the pit the flame must stay inside
    pub limit_radius: f32,
    /// Hp lost per obstacle hit
    pub hit_damage: f32,
}

impl Default for FlameConfig {
    fn default() -> Self {
        Self {
            speed: Vec3::new(4.0, 6.0, 4.0),
            oscillation_speed: 2.0,
            collider_radius: 0.5,
            limit_radius: 5.0,
            hit_damage: 1.0,
        }
    }
}

/// The flame and its light emission.
#[derive(Debug)]
pub struct Flame {
    config: FlameConfig,
    transform: Transform,
    /// Input displacement gathered since the last `advance()`
    displacement: Vec3,
    emission: LightEmission,
    enabled: bool,
}

impl Flame {
    /// Create an enabled flame at the origin.
    ///
    /// # Errors
    ///
    /// Returns the emission's configuration error.
    pub fn new(config: FlameConfig, emission: EmissionConfig) -> Result<Self, SequenceError> {
        Ok(Self {
            config,
            transform: Transform::IDENTITY,
            displacement: Vec3::ZERO,
            emission: LightEmission::new(emission)?,
            enabled: true,
        })
    }

    /// Enable or disable player control. Forward motion continues regardless.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queue a move along the camera's `right` and `up` axes.
    pub fn move_by(&mut self, axes: Vec2, right: Vec3, up: Vec3) {
        if !self.enabled {
            return;
        }

        self.displacement +=
            right * axes.x * self.config.speed.x + up * axes.y * self.config.speed.z;
    }

    /// Start a light emission pulse if none is running.
    pub fn emit_light(&mut self) -> bool {
        self.enabled && self.emission.trigger()
    }

    /// Put the light out, cutting any emission pulse short.
    ///
    /// Returns the interrupted emission phase.
    pub fn extinguish(&mut self) -> Option<EmissionPhase> {
        self.displacement = Vec3::ZERO;
        self.emission.reset()
    }

    /// Move forward and apply queued displacement over `delta_time` seconds,
    /// then advance the light emission.
    ///
    /// Returns the emission's new phase if it changed.
    pub fn advance(&mut self, delta_time: f32) -> Option<EmissionPhase> {
        if delta_time.is_nan() || delta_time < 0.0 {
            log::warn!("Ignoring invalid flame delta {delta_time}");
            return None;
        }

        let forward = self.transform.up() * self.config.speed.y;
        self.transform.translate((forward + self.displacement) * delta_time);
        self.displacement = Vec3::ZERO;

        self.emission.tick(delta_time)
    }

    /// Keep the flame's distance from the pit's vertical axis within
    /// `limit_radius` minus its collider radius. Returns whether it was clamped.
    pub fn limit_to_pit(&mut self, limit_radius: f32) -> bool {
        let position = self.transform.position;
        let center = Vec3::new(0.0, position.y, 0.0);
        let direction = position - center;
        let limit = (limit_radius - self.config.collider_radius).max(0.0);

        if direction.length_squared() < limit * limit {
            return false;
        }

        self.transform.position = center + direction.normalize_or_zero() * limit;
        true
    }

    /// Light range at `time` seconds: the emission's range while emitting,
    /// otherwise an oscillation over the emission radius.
    #[must_use]
    pub fn light_range(&self, time: f32) -> f32 {
        if self.emission.is_emitting() {
            self.emission.range()
        } else {
            (time * self.config.oscillation_speed).sin() * self.emission.config().radius
        }
    }

    /// Whether a sphere at `center` with `radius` touches the flame.
    #[must_use]
    pub fn overlaps(&self, center: Vec3, radius: f32) -> bool {
        let reach = radius + self.config.collider_radius;
        self.transform.position.distance_squared(center) <= reach * reach
    }

    /// Signed distance of `point` ahead of the flame along its forward axis.
    #[must_use]
    pub fn distance_ahead(&self, point: Vec3) -> f32 {
        (point - self.transform.position).dot(self.transform.up())
    }

    #[must_use]
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[must_use]
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Teleport the flame
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    #[must_use]
    #[inline]
    pub fn config(&self) -> &FlameConfig {
        &self.config
    }

    #[must_use]
    #[inline]
    pub fn emission(&self) -> &LightEmission {
        &self.emission
    }
}
