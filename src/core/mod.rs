//! Core engine module
//!
//! Headless frame loop, clock, event queue, configuration and transforms

mod config;
mod engine;
mod events;
mod time;
mod transform;

pub use config::{ConfigError, EngineSettings, GameConfig, PoolsConfig, PrototypeConfig};
pub use engine::{Engine, EngineConfig, EngineContext, Game, InputDriver};
pub use events::{EventQueue, GameEvent};
pub use time::Time;
pub use transform::{Transform, euler_degrees};
