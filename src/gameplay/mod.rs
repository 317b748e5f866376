//! Flamingo gameplay: the flame, its health, the obstacle spawner and the
//! session that ties them to the engine loop

mod flame;
mod health;
mod session;
mod spawner;

pub use flame::{Flame, FlameConfig};
pub use health::{Health, HealthConfig, HealthError, HealthEvent};
pub use session::{FlamingoGame, SessionError, SessionState, SessionStats};
pub use spawner::{MAX_TRAIL_PLACEMENTS, ObstacleSpawner, SpawnerConfig, SpawnerError};
