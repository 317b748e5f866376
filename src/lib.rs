//! Flamingo runtime core
//!
//! The engine-independent parts of an endless-runner where a flame descends
//! a pit full of obstacles:
//! - Cooldown timers and recycling object pools
//! - Light emission and button mashing sequences as state machines
//! - Flame, health and obstacle spawning gameplay
//! - A headless fixed-step loop driven by RON/JSON configuration

pub mod core;
pub mod effects;
pub mod gameplay;
pub mod input;
pub mod math;
pub mod pool;
pub mod timing;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{
        Engine, EngineConfig, EngineContext, EventQueue, Game, GameConfig, GameEvent, Time,
        Transform,
    };
    pub use crate::effects::{ButtonMashing, EmissionPhase, LightEmission, MashingOutcome};
    pub use crate::gameplay::{Flame, FlamingoGame, Health, HealthEvent, SessionState};
    pub use crate::input::{Action, Input};
    pub use crate::math::GameRng;
    pub use crate::pool::{Pool, PoolHandle, PoolIndex, PoolRegistry, Poolable, PooledObject};
    pub use crate::timing::Cooldown;
    pub use glam::{Quat, Vec2, Vec3};
}
