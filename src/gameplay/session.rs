//! A full run: opening mashing sequence, then the flame's descent
//!
//! [`FlamingoGame`] owns every gameplay system and the pool registry and is
//! driven by the [`Engine`](crate::core::Engine) through the [`Game`] trait.

use std::fmt;

use glam::Vec3;
use serde::Serialize;

use super::flame::Flame;
use super::health::{Health, HealthError, HealthEvent};
use super::spawner::{ObstacleSpawner, SpawnerError};
use crate::core::{ConfigError, EngineContext, Game, GameConfig, GameEvent};
use crate::effects::{ButtonMashing, EmissionPhase, MashingOutcome, SequenceError};
use crate::input::Action;
use crate::math::GameRng;
use crate::pool::{PoolError, PoolHandle, PoolRegistry};

/// Camera axes the flame is steered along; the camera looks down the pit.
const CAMERA_RIGHT: Vec3 = Vec3::X;
const CAMERA_UP: Vec3 = Vec3::Z;

/// Distance behind the flame after which pooled entities are released.
const RELEASE_BEHIND: f32 = 2.0;

/// Obstacles are topped up while fewer than this many units lie ahead.
const SPAWN_LOOKAHEAD: f32 = 30.0;

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    /// Opening sequence, flame disabled
    Mashing,
    /// Flame descending under player control
    Running,
    /// Mashing failed or health ran out
    Over,
}

impl SessionState {
    /// Name pushed with [`GameEvent::StateChanged`]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mashing => "mashing",
            Self::Running => "running",
            Self::Over => "over",
        }
    }
}

/// Counters gathered over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub mash_presses: u32,
    pub obstacles_spawned: u32,
    pub obstacles_released: u32,
    pub pits_spawned: u32,
    pub pits_released: u32,
    pub hits: u32,
    pub emissions: u32,
    /// Distance travelled by the flame
    pub distance: f32,
    /// Seconds spent in [`SessionState::Running`]
    pub running_time: f32,
}

/// The Flamingo game.
pub struct FlamingoGame {
    config: GameConfig,
    state: SessionState,
    registry: PoolRegistry,
    spawner: ObstacleSpawner,
    flame: Flame,
    health: Health,
    mashing: ButtonMashing,
    live_pits: Vec<PoolHandle>,
    light_range: f32,
    stats: SessionStats,
}

impl FlamingoGame {
    /// Build every system from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the configuration is rejected.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let rng = GameRng::from_optional_seed(config.seed);
        match rng.seed {
            Some(seed) => log::info!("Session seeded with {seed}"),
            None => log::info!("Session seeded from entropy"),
        }

        let registry = PoolRegistry::from_config(&config.pools)?;
        let spawner = ObstacleSpawner::new(config.spawner.clone(), rng)?;
        let mut flame = Flame::new(config.flame, config.emission)?;
        flame.set_enabled(false);
        let health = Health::new(config.health)?;
        let mashing = ButtonMashing::new(config.mashing)?;

        Ok(Self {
            config,
            state: SessionState::Mashing,
            registry,
            spawner,
            flame,
            health,
            mashing,
            live_pits: Vec::new(),
            light_range: 0.0,
            stats: SessionStats::default(),
        })
    }

    fn set_state(&mut self, state: SessionState, engine: &mut EngineContext) {
        if self.state == state {
            return;
        }

        log::info!("Session {} -> {}", self.state.name(), state.name());
        self.state = state;
        engine.events.push(GameEvent::StateChanged {
            state: state.name(),
        });

        match state {
            SessionState::Running => self.flame.set_enabled(true),
            SessionState::Over => {
                self.flame.set_enabled(false);
                if self.flame.extinguish().is_some() {
                    engine.events.push(GameEvent::EmissionPhaseChanged {
                        phase: EmissionPhase::Idle,
                    });
                }
                engine.quit();
            }
            SessionState::Mashing => {}
        }
    }

    fn update_mashing(&mut self, engine: &mut EngineContext, delta_time: f32) {
        let mut outcome = None;

        if engine.input.is_just_pressed(Action::Mash) {
            self.stats.mash_presses += 1;
            outcome = self.mashing.press();
        }
        if outcome.is_none() {
            outcome = self.mashing.tick(delta_time);
        }

        let Some(outcome) = outcome else {
            return;
        };

        engine.events.push(GameEvent::MashingFinished { outcome });
        match outcome {
            MashingOutcome::Succeeded => self.set_state(SessionState::Running, engine),
            MashingOutcome::Failed => self.set_state(SessionState::Over, engine),
            MashingOutcome::Pending => {}
        }
    }

    fn update_flame(&mut self, engine: &mut EngineContext, delta_time: f32) {
        self.flame
            .move_by(engine.input.axes(), CAMERA_RIGHT, CAMERA_UP);

        if engine.input.is_just_pressed(Action::EmitLight) && self.flame.emit_light() {
            self.stats.emissions += 1;
        }

        let before = self.flame.position();
        if let Some(phase) = self.flame.advance(delta_time) {
            engine.events.push(GameEvent::EmissionPhaseChanged { phase });
        }
        self.flame.limit_to_pit(self.config.flame.limit_radius);

        self.stats.distance += self.flame.position().distance(before);
        self.stats.running_time += delta_time;
        self.light_range = self.flame.light_range(engine.time.elapsed_seconds());
    }

    fn update_health(&mut self, engine: &mut EngineContext, delta_time: f32) {
        if let Some(event) = self.health.tick(delta_time) {
            engine.events.push(GameEvent::Health(event));
        }
    }

    fn resolve_collisions(&mut self, engine: &mut EngineContext) {
        let radius = self.config.spawner.obstacle_radius;
        let hits: Vec<PoolHandle> = self
            .registry
            .active_obstacles()
            .filter(|(_, obstacle)| self.flame.overlaps(obstacle.transform.position, radius))
            .map(|(handle, _)| handle)
            .collect();

        for handle in hits {
            let damage = self.config.flame.hit_damage;
            self.stats.hits += 1;
            engine.events.push(GameEvent::FlameHit {
                obstacle: handle,
                damage,
            });

            let event = self.health.give_damage(damage, true);
            if let Some(event) = event {
                engine.events.push(GameEvent::Health(event));
            }

            self.release(handle, engine);

            if matches!(event, Some(HealthEvent::FullyDepleted { .. })) {
                log::info!("Flame extinguished after {} hits", self.stats.hits);
                self.set_state(SessionState::Over, engine);
                return;
            }
        }
    }

    fn release_behind(&mut self, engine: &mut EngineContext) {
        let behind: Vec<PoolHandle> = self
            .registry
            .active_obstacles()
            .filter(|(_, obstacle)| {
                self.flame.distance_ahead(obstacle.transform.position) < -RELEASE_BEHIND
            })
            .map(|(handle, _)| handle)
            .collect();

        for handle in behind {
            self.release(handle, engine);
        }

        let margin = RELEASE_BEHIND + self.config.spawner.pit_width;
        let mut passed = Vec::new();
        self.live_pits.retain(|&handle| {
            let behind = self
                .registry
                .get(handle)
                .is_some_and(|pit| self.flame.distance_ahead(pit.transform.position) < -margin);
            if behind {
                passed.push(handle);
            }
            !behind
        });

        for handle in passed {
            self.release(handle, engine);
            self.spawn_pit(engine);
        }
    }

    fn spawn_ahead(&mut self, engine: &mut EngineContext) {
        if self.flame.distance_ahead(self.spawner.cursor()) >= SPAWN_LOOKAHEAD {
            return;
        }

        let (handles, _trigger) = self.spawner.generate_obstacle_set(&mut self.registry);
        self.record_obstacles(&handles, engine);
    }

    fn spawn_pit(&mut self, engine: &mut EngineContext) {
        let handle = self.spawner.extend_pit_trail(&mut self.registry);
        self.record_pits(&[handle], engine);
    }

    fn release(&mut self, handle: PoolHandle, engine: &mut EngineContext) {
        if !self.registry.release(handle) {
            return;
        }

        match handle {
            PoolHandle::Obstacle { .. } => self.stats.obstacles_released += 1,
            PoolHandle::Pit(_) => self.stats.pits_released += 1,
        }
        engine.events.push(GameEvent::EntityReleased { handle });
    }

    fn record_obstacles(&mut self, handles: &[PoolHandle], engine: &mut EngineContext) {
        for &handle in handles {
            if let Some(obstacle) = self.registry.get(handle) {
                engine.events.push(GameEvent::ObstacleSpawned {
                    handle,
                    position: obstacle.transform.position,
                });
            }
        }
        self.stats.obstacles_spawned += handles.len() as u32;
    }

    fn record_pits(&mut self, handles: &[PoolHandle], engine: &mut EngineContext) {
        for &handle in handles {
            if let Some(pit) = self.registry.get(handle) {
                engine.events.push(GameEvent::PitSpawned {
                    handle,
                    position: pit.transform.position,
                });
            }
            // A saturated pool hands back a reclaimed segment already tracked
            if !self.live_pits.contains(&handle) {
                self.live_pits.push(handle);
            }
        }
        self.stats.pits_spawned += handles.len() as u32;
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn flame(&self) -> &Flame {
        &self.flame
    }

    #[must_use]
    pub fn health(&self) -> &Health {
        &self.health
    }

    #[must_use]
    pub fn mashing(&self) -> &ButtonMashing {
        &self.mashing
    }

    #[must_use]
    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// Light range computed on the last running frame
    #[must_use]
    pub fn light_range(&self) -> f32 {
        self.light_range
    }
}

impl Game for FlamingoGame {
    fn init(&mut self, engine: &mut EngineContext) {
        let pits = self
            .spawner
            .generate_pit_trail(&mut self.registry, self.config.flame.speed.z);
        self.record_pits(&pits, engine);

        let obstacles = self.spawner.generate_obstacle_set_on_trail(&mut self.registry);
        self.record_obstacles(&obstacles, engine);

        engine.events.push(GameEvent::StateChanged {
            state: self.state.name(),
        });
        log::info!(
            "Session ready: {} pits, {} obstacles on a {:.1} unit trail",
            pits.len(),
            obstacles.len(),
            self.spawner.trail_length()
        );
    }

    fn update(&mut self, engine: &mut EngineContext) {
        let delta_time = engine.time.delta_seconds();

        match self.state {
            SessionState::Mashing => self.update_mashing(engine, delta_time),
            SessionState::Running => {
                self.update_flame(engine, delta_time);
                self.update_health(engine, delta_time);
                self.resolve_collisions(engine);
                if self.state == SessionState::Running {
                    self.release_behind(engine);
                    self.spawn_ahead(engine);
                }
            }
            SessionState::Over => engine.quit(),
        }
    }

    fn shutdown(&mut self, _engine: &mut EngineContext) {
        log::info!(
            "Session over in state {}: {:.1} units travelled, {} hits, hp {}",
            self.state.name(),
            self.stats.distance,
            self.stats.hits,
            self.health
        );
        self.registry.release_all();
        self.live_pits.clear();
    }
}

impl fmt::Debug for FlamingoGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlamingoGame")
            .field("state", &self.state)
            .field("flame", &self.flame.position())
            .field("health", &self.health.hp())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Errors raised while building a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Configuration failed validation
    Config(ConfigError),
    /// A pool could not be built
    Pool(PoolError),
    /// The spawner rejected its settings
    Spawner(SpawnerError),
    /// A timed sequence rejected its settings
    Sequence(SequenceError),
    /// Health rejected its settings
    Health(HealthError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Pool(e) => write!(f, "Pool error: {e}"),
            Self::Spawner(e) => write!(f, "Spawner error: {e}"),
            Self::Sequence(e) => write!(f, "Sequence error: {e}"),
            Self::Health(e) => write!(f, "Health error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PoolError> for SessionError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

impl From<SpawnerError> for SessionError {
    fn from(e: SpawnerError) -> Self {
        Self::Spawner(e)
    }
}

impl From<SequenceError> for SessionError {
    fn from(e: SequenceError) -> Self {
        Self::Sequence(e)
    }
}

impl From<HealthError> for SessionError {
    fn from(e: HealthError) -> Self {
        Self::Health(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Engine, EngineConfig, PoolsConfig, PrototypeConfig};
    use crate::effects::MashingConfig;
    use crate::gameplay::HealthConfig;
    use crate::math::FloatRange;

    fn config() -> GameConfig {
        let mut config = GameConfig {
            seed: Some(5),
            ..Default::default()
        };
        config.pools = PoolsConfig {
            obstacles: vec![PrototypeConfig::new("rock", 16), PrototypeConfig::new("log", 16)],
            pit: PrototypeConfig::new("pit", 16),
        };
        config.spawner.weights = vec![1.0, 1.0];
        config.spawner.loop_seconds = 5.0;
        config.mashing = MashingConfig {
            acceleration: 0.2,
            deceleration: 0.5,
            min_limit: 0.0,
            max_limit: 1.0,
        };
        config
    }

    fn mash_every_frame(engine: Engine<FlamingoGame>) -> Engine<FlamingoGame> {
        engine.with_input_driver(|_, input| input.tap(Action::Mash))
    }

    #[test]
    fn test_init_lays_trail() {
        let game = FlamingoGame::new(config()).unwrap();
        let mut engine = Engine::new(EngineConfig::default(), game);

        engine.step();

        let game = engine.game();
        // 5 s at 4 units/s = 20 units of 4-unit pits
        assert_eq!(game.stats().pits_spawned, 5);
        assert!(game.stats().obstacles_spawned > 0);
        assert_eq!(game.state(), SessionState::Mashing);
        assert!(!game.flame().is_enabled());
    }

    #[test]
    fn test_mashing_success_starts_run() {
        let game = FlamingoGame::new(config()).unwrap();
        let mut engine = mash_every_frame(Engine::new(EngineConfig::default(), game));

        for _ in 0..3 {
            engine.step();
        }

        let game = engine.game();
        assert_eq!(game.state(), SessionState::Running);
        assert!(game.flame().is_enabled());
        assert_eq!(game.stats().mash_presses, 3);
    }

    #[test]
    fn test_mashing_failure_ends_run() {
        let game = FlamingoGame::new(config()).unwrap();
        let mut engine = Engine::new(EngineConfig::default().with_max_frames(600), game);

        let frames = engine.run();

        // 0.5 drained at 0.5 per second
        assert!(frames <= 61, "quit after {frames} frames");
        assert_eq!(engine.game().state(), SessionState::Over);
        assert_eq!(engine.game().mashing().outcome(), MashingOutcome::Failed);
    }

    #[test]
    fn test_flame_descends_and_hits_obstacles() {
        let mut config = config();
        config.health = HealthConfig {
            max_hp: 100.0,
            invincibility_duration: 0.0,
        };
        let game = FlamingoGame::new(config).unwrap();
        let mut engine = mash_every_frame(Engine::new(EngineConfig::default(), game));

        for _ in 0..240 {
            engine.step();
        }

        let game = engine.game();
        assert_eq!(game.state(), SessionState::Running);
        assert!(game.flame().position().y > 10.0);
        assert!(game.stats().hits > 0, "obstacles sit on the flame's path");
        assert!(game.health().hp() < 100.0);
    }

    #[test]
    fn test_passed_entities_are_released_and_replaced() {
        let mut config = config();
        config.health = HealthConfig {
            max_hp: 1000.0,
            invincibility_duration: 0.0,
        };
        config.spawner.separation = FloatRange::new(3.0, 3.0);
        let game = FlamingoGame::new(config).unwrap();
        let mut engine = mash_every_frame(Engine::new(EngineConfig::default(), game));

        for _ in 0..600 {
            engine.step();
        }

        let game = engine.game();
        let stats = game.stats();
        assert!(stats.pits_released > 0);
        assert_eq!(stats.pits_spawned - stats.pits_released, 5);
        assert!(stats.obstacles_spawned > stats.obstacles_released);

        let flame = game.flame();
        for (_, obstacle) in game.registry().active_obstacles() {
            assert!(flame.distance_ahead(obstacle.transform.position) >= -RELEASE_BEHIND - 1.0);
        }
    }

    #[test]
    fn test_health_depletion_ends_run() {
        let mut config = config();
        config.health = HealthConfig {
            max_hp: 1.0,
            invincibility_duration: 0.0,
        };
        let game = FlamingoGame::new(config).unwrap();
        let mut engine =
            mash_every_frame(Engine::new(EngineConfig::default().with_max_frames(1200), game));

        engine.run();

        let game = engine.game();
        assert_eq!(game.state(), SessionState::Over);
        assert_eq!(game.stats().hits, 1);
        assert!(game.health().is_depleted());
        assert_eq!(game.flame().emission().phase(), EmissionPhase::Idle);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.pools.pit.capacity = 0;

        assert!(matches!(
            FlamingoGame::new(config),
            Err(SessionError::Config(ConfigError::Invalid(_)))
        ));
    }
}
