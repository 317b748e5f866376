//! Game configuration loading and saving
//!
//! Every tunable of a run lives in one [`GameConfig`], stored as RON (Rusty
//! Object Notation) or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effects::{EmissionConfig, MashingConfig};
use crate::gameplay::{FlameConfig, HealthConfig, SpawnerConfig};

/// Headless loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Name logged at startup
    pub title: String,
    /// Simulated frames per second
    pub target_fps: u32,
    /// Stop after this many frames (0 runs until the game quits)
    pub max_frames: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            title: String::from("Flamingo"),
            target_fps: 60,
            max_frames: 3600,
        }
    }
}

/// One pool to pre-build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrototypeConfig {
    /// Name given to every entity of the pool
    pub name: String,
    /// Number of entities built up front
    pub capacity: usize,
}

impl PrototypeConfig {
    /// Create a prototype entry
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// Obstacle pools, one per category in order, plus the pit pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolsConfig {
    pub obstacles: Vec<PrototypeConfig>,
    pub pit: PrototypeConfig,
}

impl Default for PoolsConfig {
    fn default() -> Self {
        Self {
            obstacles: vec![
                PrototypeConfig::new("rock", 24),
                PrototypeConfig::new("branch", 16),
                PrototypeConfig::new("crystal", 8),
            ],
            pit: PrototypeConfig::new("pit", 48),
        }
    }
}

/// Complete configuration of a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed; entropy when absent
    pub seed: Option<u64>,
    pub engine: EngineSettings,
    pub pools: PoolsConfig,
    pub spawner: SpawnerConfig,
    pub flame: FlameConfig,
    pub emission: EmissionConfig,
    pub mashing: MashingConfig,
    pub health: HealthConfig,
}

impl GameConfig {
    /// Run every constructor check up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |section: &str, e: &dyn std::fmt::Display| {
            ConfigError::Invalid(format!("{section}: {e}"))
        };

        if self.engine.target_fps == 0 {
            return Err(ConfigError::Invalid(String::from(
                "engine: target_fps must be > 0",
            )));
        }

        let mut pools = self.pools.obstacles.iter().chain(std::iter::once(&self.pools.pit));
        if let Some(empty) = pools.find(|proto| proto.capacity == 0) {
            return Err(ConfigError::Invalid(format!(
                "pools: '{}' has capacity 0",
                empty.name
            )));
        }

        if self.spawner.weights.len() != self.pools.obstacles.len() {
            return Err(ConfigError::Invalid(format!(
                "spawner: {} weights for {} obstacle pools",
                self.spawner.weights.len(),
                self.pools.obstacles.len()
            )));
        }

        self.spawner.validate().map_err(|e| invalid("spawner", &e))?;
        self.emission.validate().map_err(|e| invalid("emission", &e))?;
        self.mashing.validate().map_err(|e| invalid("mashing", &e))?;
        crate::gameplay::Health::new(self.health).map_err(|e| invalid("health", &e))?;

        let flame = &self.flame;
        for (field, value) in [
            ("oscillation_speed", flame.oscillation_speed),
            ("collider_radius", flame.collider_radius),
            ("limit_radius", flame.limit_radius),
            ("hit_damage", flame.hit_damage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "flame: {field} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !flame.speed.is_finite() {
            return Err(ConfigError::Invalid(String::from("flame: speed must be finite")));
        }

        // The pit trail is laid at the flame's vertical speed
        self.spawner
            .check_trail(flame.speed.z)
            .map_err(|e| invalid("spawner", &e))?;

        Ok(())
    }

    /// Load from a file, picking the format by extension (`.json`, otherwise RON).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::load_json(path)
        } else {
            Self::load_ron(path)
        }
    }

    /// Save the configuration to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load and validate a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: GameConfig =
            ron::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// Parsed but rejected by validation
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FloatRange;

    #[test]
    fn test_default_config_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_config_ron_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");

        let config = GameConfig {
            seed: Some(42),
            ..Default::default()
        };
        config.save_ron(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_json_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");

        let mut config = GameConfig::default();
        config.pools.pit.capacity = 5;
        config.save_json(&path).unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.pools.pit.capacity, 5);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GameConfig = ron::from_str("(seed: Some(7))").unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pools, PoolsConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = GameConfig::default();
        config.pools.obstacles[1].capacity = 0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::Invalid(String::from(
                "pools: 'branch' has capacity 0"
            )))
        );
    }

    #[test]
    fn test_weight_count_must_match_pools() {
        let mut config = GameConfig::default();
        config.spawner.weights.pop();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_dense_trail_rejected() {
        let mut config = GameConfig::default();
        config.spawner.separation = FloatRange::new(1e-7, 1e-7);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = GameConfig::default();
        config.spawner.loop_seconds = 1e9;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_file_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");

        let mut config = GameConfig::default();
        config.emission.cooldown = -1.0;
        config.save_ron(&path).unwrap();

        assert!(matches!(
            GameConfig::load_ron(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = GameConfig::load_json("/definitely/not/here.json");

        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_garbage_is_deserialize_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.ron");
        fs::write(&path, "not a config").unwrap();

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::DeserializeError(_))
        ));
    }
}
