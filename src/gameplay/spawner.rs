//! Lays out pit segments and obstacles ahead of the flame
//!
//! All placement goes through the [`PoolRegistry`], so a long run keeps
//! reusing the same pre-built entities.

use std::fmt;

use glam::{Quat, Vec3};
use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::core::euler_degrees;
use crate::math::{FloatRange, GameRng, IntRange};
use crate::pool::{CategoryId, PoolHandle, PoolRegistry};

/// Most pit segments or obstacles one trail may hold
pub const MAX_TRAIL_PLACEMENTS: usize = 4096;

/// Spawner tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    /// Relative spawn chance of each obstacle category
    pub weights: Vec<f32>,
    /// Distance between consecutive obstacles
    pub separation: FloatRange,
    /// Obstacles per call to [`ObstacleSpawner::generate_obstacle_set`]
    pub obstacles_per_creation: IntRange,
    /// Axis obstacles spin around
    pub rotation_axis: Vec3,
    /// Direction the trail extends in
    pub direction_axis: Vec3,
    /// Distance from the origin to the start of the trail
    pub initial_distance: f32,
    /// Seconds of travel the pit trail covers
    pub loop_seconds: f32,
    /// Length of one pit segment along the trail
    pub pit_width: f32,
    /// Rotation applied to every pit segment
    pub pit_rotation: Quat,
    /// Collision radius of a spawned obstacle
    pub obstacle_radius: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            weights: vec![3.0, 2.0, 1.0],
            separation: FloatRange::new(4.0, 8.0),
            obstacles_per_creation: IntRange::new(3, 6),
            rotation_axis: Vec3::Y,
            direction_axis: Vec3::Y,
            initial_distance: 10.0,
            loop_seconds: 30.0,
            pit_width: 4.0,
            pit_rotation: Quat::IDENTITY,
            obstacle_radius: 1.0,
        }
    }
}

impl SpawnerConfig {
    /// Check axes, ranges and sizes.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field as a [`SpawnerError`].
    pub fn validate(&self) -> Result<(), SpawnerError> {
        if self.direction_axis.length_squared() == 0.0 || !self.direction_axis.is_finite() {
            return Err(SpawnerError::ZeroAxis("direction_axis"));
        }
        if self.rotation_axis.length_squared() == 0.0 || !self.rotation_axis.is_finite() {
            return Err(SpawnerError::ZeroAxis("rotation_axis"));
        }
        if !self.separation.is_valid() || self.separation.min <= 0.0 {
            return Err(SpawnerError::InvalidRange("separation"));
        }
        if !self.obstacles_per_creation.is_valid() || self.obstacles_per_creation.min < 0 {
            return Err(SpawnerError::InvalidRange("obstacles_per_creation"));
        }

        for (field, value) in [
            ("pit_width", self.pit_width),
            ("initial_distance", self.initial_distance),
            ("loop_seconds", self.loop_seconds),
            ("obstacle_radius", self.obstacle_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SpawnerError::InvalidValue { field, value });
            }
        }
        if self.pit_width == 0.0 {
            return Err(SpawnerError::InvalidValue {
                field: "pit_width",
                value: self.pit_width,
            });
        }

        WeightedIndex::<f32>::new(self.weights.iter().copied()).map_err(|_| SpawnerError::InvalidWeights)?;
        Ok(())
    }

    /// Check that a trail laid at `flame_speed` needs at most
    /// [`MAX_TRAIL_PLACEMENTS`] pit segments and obstacles.
    ///
    /// # Errors
    ///
    /// Returns [`SpawnerError::TrailTooDense`] naming the spacing that is too small.
    pub fn check_trail(&self, flame_speed: f32) -> Result<(), SpawnerError> {
        let trail_length = (self.loop_seconds * flame_speed).max(0.0);

        for (field, spacing) in [
            ("pit_width", self.pit_width),
            ("separation", self.separation.min),
        ] {
            let placements = trail_length / spacing;
            if !placements.is_finite() || placements > MAX_TRAIL_PLACEMENTS as f32 {
                return Err(SpawnerError::TrailTooDense { field, placements });
            }
        }
        Ok(())
    }
}

/// Places pit trails and obstacle sets through the registry.
#[derive(Debug)]
pub struct ObstacleSpawner {
    config: SpawnerConfig,
    distribution: WeightedIndex<f32>,
    direction: Vec3,
    rotation_axis: Vec3,
    /// Start of the trail
    origin: Vec3,
    /// Where the next obstacle set begins
    cursor: Vec3,
    /// Where the next pit segment goes
    pit_cursor: Vec3,
    trail_length: f32,
    rng: GameRng,
}

impl ObstacleSpawner {
    /// Create a spawner whose trail starts `initial_distance` along the direction axis.
    ///
    /// # Errors
    ///
    /// See [`SpawnerConfig::validate`].
    pub fn new(config: SpawnerConfig, rng: GameRng) -> Result<Self, SpawnerError> {
        config.validate()?;

        let distribution = WeightedIndex::new(config.weights.iter().copied())
            .map_err(|_| SpawnerError::InvalidWeights)?;
        let direction = config.direction_axis.normalize();
        let origin = direction * config.initial_distance;

        Ok(Self {
            rotation_axis: config.rotation_axis.normalize(),
            config,
            distribution,
            direction,
            origin,
            cursor: origin,
            pit_cursor: origin,
            trail_length: 0.0,
            rng,
        })
    }

    /// Lay pit segments covering `loop_seconds` of travel at `flame_speed`.
    ///
    /// Returns the handles of the spawned segments in trail order.
    pub fn generate_pit_trail(
        &mut self,
        registry: &mut PoolRegistry,
        flame_speed: f32,
    ) -> Vec<PoolHandle> {
        self.trail_length = (self.config.loop_seconds * flame_speed).max(0.0);

        let width = self.config.pit_width;
        let mut count = (self.trail_length / width).ceil() as usize;
        if count > MAX_TRAIL_PLACEMENTS {
            log::warn!("Pit trail needs {count} segments, capping at {MAX_TRAIL_PLACEMENTS}");
            count = MAX_TRAIL_PLACEMENTS;
        }
        let mut position = self.origin + self.direction * (width * 0.5);

        let handles: Vec<PoolHandle> = (0..count)
            .map(|_| {
                let handle = registry.request_pit(position, self.config.pit_rotation);
                position += self.direction * width;
                handle
            })
            .collect();
        self.pit_cursor = position;

        log::info!(
            "Pit trail: {count} segments over {:.1} units",
            self.trail_length
        );
        handles
    }

    /// Add one pit segment at the far end of the trail.
    pub fn extend_pit_trail(&mut self, registry: &mut PoolRegistry) -> PoolHandle {
        if self.pit_cursor == self.origin {
            self.pit_cursor += self.direction * (self.config.pit_width * 0.5);
        }

        let handle = registry.request_pit(self.pit_cursor, self.config.pit_rotation);
        self.pit_cursor += self.direction * self.config.pit_width;
        handle
    }

    /// Fill the trail with obstacles until their separation covers its length,
    /// placing at most [`MAX_TRAIL_PLACEMENTS`].
    ///
    /// Call after [`Self::generate_pit_trail`]; an empty trail spawns nothing.
    pub fn generate_obstacle_set_on_trail(&mut self, registry: &mut PoolRegistry) -> Vec<PoolHandle> {
        let mut handles = Vec::new();
        let mut position = self.origin;
        let mut covered = 0.0;

        for _ in 0..MAX_TRAIL_PLACEMENTS {
            if covered >= self.trail_length {
                break;
            }
            let separation = self.place_next(registry, position, &mut handles);
            position += self.direction * separation;
            covered += separation;
        }
        if covered < self.trail_length {
            log::warn!(
                "Trail obstacles capped at {MAX_TRAIL_PLACEMENTS}, {covered:.1} of {:.1} units covered",
                self.trail_length
            );
        }

        self.cursor = position;
        log::debug!("Trail obstacles: {} placed", handles.len());
        handles
    }

    /// Place a randomly sized set of obstacles starting at the cursor.
    ///
    /// Returns the spawned handles and the trigger offset, half of the
    /// distance the set spans.
    pub fn generate_obstacle_set(&mut self, registry: &mut PoolRegistry) -> (Vec<PoolHandle>, Vec3) {
        let count = self.config.obstacles_per_creation.sample(&mut self.rng).max(0);
        let start = self.cursor;
        let mut position = start;
        let mut handles = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let separation = self.place_next(registry, position, &mut handles);
            position += self.direction * separation;
        }

        self.cursor = position;
        let trigger = (position - start) * 0.5;
        log::debug!("Obstacle set: {} placed, trigger offset {trigger}", handles.len());
        (handles, trigger)
    }

    /// Spawn one obstacle at `position`; returns the separation to the next one.
    fn place_next(
        &mut self,
        registry: &mut PoolRegistry,
        position: Vec3,
        handles: &mut Vec<PoolHandle>,
    ) -> f32 {
        let category: CategoryId = self.rng.weighted(&self.distribution);
        let separation = self.config.separation.sample(&mut self.rng);
        let angle = self.rng.degree();
        let rotation = euler_degrees(self.rotation_axis * angle);

        if let Some(handle) = registry.request_obstacle(category, position, rotation) {
            handles.push(handle);
        }

        separation
    }

    /// Length of the current pit trail
    #[must_use]
    pub fn trail_length(&self) -> f32 {
        self.trail_length
    }

    /// Start of the trail
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Where the next obstacle set begins
    #[must_use]
    pub fn cursor(&self) -> Vec3 {
        self.cursor
    }

    /// Where the next pit segment goes
    #[must_use]
    pub fn pit_cursor(&self) -> Vec3 {
        self.pit_cursor
    }

    /// Normalized direction the trail extends in
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[must_use]
    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }
}

/// Errors raised when configuring the spawner
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnerError {
    /// An axis had zero length
    ZeroAxis(&'static str),
    /// A range was empty or out of bounds
    InvalidRange(&'static str),
    /// A size or duration was negative or not finite
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// Weights were empty, negative or all zero
    InvalidWeights,
    /// A trail would need more than [`MAX_TRAIL_PLACEMENTS`] pits or obstacles
    TrailTooDense {
        /// Spacing that is too small for the trail length
        field: &'static str,
        /// Placements the trail would need
        placements: f32,
    },
}

impl fmt::Display for SpawnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAxis(field) => write!(f, "Invalid argument: {field} has zero length"),
            Self::InvalidRange(field) => write!(f, "Invalid argument: {field} is not a valid range"),
            Self::InvalidValue { field, value } => {
                write!(f, "Invalid argument: {field} must be finite and >= 0, got {value}")
            }
            Self::InvalidWeights => {
                write!(f, "Invalid argument: weights must be non-negative with a positive sum")
            }
            Self::TrailTooDense { field, placements } => write!(
                f,
                "Invalid argument: {field} needs {placements} placements per trail, limit is {MAX_TRAIL_PLACEMENTS}"
            ),
        }
    }
}

impl std::error::Error for SpawnerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PoolsConfig, PrototypeConfig};

    fn registry() -> PoolRegistry {
        PoolRegistry::from_config(&PoolsConfig {
            obstacles: vec![PrototypeConfig::new("rock", 8), PrototypeConfig::new("log", 8)],
            pit: PrototypeConfig::new("pit", 8),
        })
        .unwrap()
    }

    fn config() -> SpawnerConfig {
        SpawnerConfig {
            weights: vec![1.0, 1.0],
            separation: FloatRange::new(2.0, 2.0),
            obstacles_per_creation: IntRange::new(3, 3),
            rotation_axis: Vec3::new(0.0, 2.0, 0.0),
            direction_axis: Vec3::new(0.0, 0.0, 3.0),
            initial_distance: 5.0,
            loop_seconds: 2.0,
            pit_width: 4.0,
            pit_rotation: Quat::IDENTITY,
            obstacle_radius: 1.0,
        }
    }

    #[test]
    fn test_origin_along_normalized_direction() {
        let spawner = ObstacleSpawner::new(config(), GameRng::from_seed(1)).unwrap();

        assert_eq!(spawner.origin(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(spawner.direction(), Vec3::Z);
    }

    #[test]
    fn test_pit_trail_layout() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(config(), GameRng::from_seed(1)).unwrap();

        // 2 seconds at 5 units/s = 10 units, ceil(10 / 4) = 3 segments
        let pits = spawner.generate_pit_trail(&mut registry, 5.0);

        assert_eq!(spawner.trail_length(), 10.0);
        assert_eq!(pits.len(), 3);

        let positions: Vec<Vec3> = pits
            .iter()
            .map(|&handle| registry.get(handle).unwrap().transform.position)
            .collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(0.0, 0.0, 7.0),
                Vec3::new(0.0, 0.0, 11.0),
                Vec3::new(0.0, 0.0, 15.0),
            ]
        );
    }

    #[test]
    fn test_extend_pit_trail_continues_layout() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(config(), GameRng::from_seed(1)).unwrap();
        spawner.generate_pit_trail(&mut registry, 5.0);

        let next = spawner.extend_pit_trail(&mut registry);

        assert_eq!(
            registry.get(next).unwrap().transform.position,
            Vec3::new(0.0, 0.0, 19.0)
        );
        assert_eq!(spawner.pit_cursor(), Vec3::new(0.0, 0.0, 23.0));
    }

    #[test]
    fn test_obstacles_cover_trail() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(config(), GameRng::from_seed(4)).unwrap();
        spawner.generate_pit_trail(&mut registry, 5.0);

        // separation fixed at 2, trail 10 => 5 obstacles
        let obstacles = spawner.generate_obstacle_set_on_trail(&mut registry);
        assert_eq!(obstacles.len(), 5);

        let first = registry.get(obstacles[0]).unwrap();
        assert_eq!(first.transform.position, Vec3::new(0.0, 0.0, 5.0));
        let last = registry.get(obstacles[4]).unwrap();
        assert_eq!(last.transform.position, Vec3::new(0.0, 0.0, 13.0));

        assert_eq!(spawner.cursor(), Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_obstacle_rotation_around_axis() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(config(), GameRng::from_seed(9)).unwrap();
        spawner.generate_pit_trail(&mut registry, 5.0);

        for handle in spawner.generate_obstacle_set_on_trail(&mut registry) {
            let rotation = registry.get(handle).unwrap().transform.rotation;
            let spun = rotation * Vec3::Y;
            assert!(spun.abs_diff_eq(Vec3::Y, 1e-4), "rotation only spins around Y");
        }
    }

    #[test]
    fn test_obstacle_set_trigger_is_midpoint() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(config(), GameRng::from_seed(2)).unwrap();

        let (handles, trigger) = spawner.generate_obstacle_set(&mut registry);

        assert_eq!(handles.len(), 3);
        assert_eq!(trigger, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(spawner.cursor(), Vec3::new(0.0, 0.0, 11.0));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let layout = |seed| {
            let mut registry = registry();
            let mut spawner = ObstacleSpawner::new(
                SpawnerConfig {
                    separation: FloatRange::new(1.0, 3.0),
                    ..config()
                },
                GameRng::from_seed(seed),
            )
            .unwrap();
            spawner.generate_pit_trail(&mut registry, 5.0);
            spawner
                .generate_obstacle_set_on_trail(&mut registry)
                .into_iter()
                .map(|handle| {
                    let object = registry.get(handle).unwrap();
                    (object.category, object.transform.position)
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(layout(21), layout(21));
    }

    #[test]
    fn test_tiny_separation_is_capped() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(
            SpawnerConfig {
                separation: FloatRange::new(1e-7, 1e-7),
                ..config()
            },
            GameRng::from_seed(3),
        )
        .unwrap();
        spawner.generate_pit_trail(&mut registry, 5.0);

        let obstacles = spawner.generate_obstacle_set_on_trail(&mut registry);

        assert_eq!(obstacles.len(), MAX_TRAIL_PLACEMENTS);
    }

    #[test]
    fn test_huge_pit_trail_is_capped() {
        let mut registry = registry();
        let mut spawner = ObstacleSpawner::new(
            SpawnerConfig {
                loop_seconds: 1e9,
                ..config()
            },
            GameRng::from_seed(3),
        )
        .unwrap();

        let pits = spawner.generate_pit_trail(&mut registry, 5.0);

        assert_eq!(pits.len(), MAX_TRAIL_PLACEMENTS);
    }

    #[test]
    fn test_check_trail_rejects_dense_trails() {
        assert_eq!(config().check_trail(5.0), Ok(()));

        let tiny_separation = SpawnerConfig {
            separation: FloatRange::new(1e-7, 1e-7),
            ..config()
        };
        assert!(matches!(
            tiny_separation.check_trail(5.0),
            Err(SpawnerError::TrailTooDense { field: "separation", .. })
        ));

        let endless = SpawnerConfig {
            loop_seconds: 1e9,
            ..config()
        };
        assert!(matches!(
            endless.check_trail(5.0),
            Err(SpawnerError::TrailTooDense { field: "pit_width", .. })
        ));
    }

    #[test]
    fn test_invalid_config() {
        let zero_axis = SpawnerConfig {
            direction_axis: Vec3::ZERO,
            ..config()
        };
        assert_eq!(
            ObstacleSpawner::new(zero_axis, GameRng::from_seed(0)).unwrap_err(),
            SpawnerError::ZeroAxis("direction_axis")
        );

        let no_weights = SpawnerConfig {
            weights: vec![0.0, 0.0],
            ..config()
        };
        assert_eq!(
            ObstacleSpawner::new(no_weights, GameRng::from_seed(0)).unwrap_err(),
            SpawnerError::InvalidWeights
        );
    }
}
