//! Simulation Configuration
//!
//! Rates, grid dimensions, seeding and asset location. Loaded from an
//! optional JSON file, then overridden from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ANIMATION_FPS, TILES_HIGH, TILES_WIDE, TILE_SIZE, UPDATES_PER_SECOND};
use crate::game::player::{PLAYER_LIVES, RESPAWN_DELAY};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid config JSON
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values are inconsistent
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Simulation configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Simulation steps per second.
    pub updates_per_second: u32,
    /// Animation ticks per second. Must not exceed the update rate.
    pub animation_fps: u32,
    /// Tile edge in pixels.
    pub tile_size: u32,
    /// Viewport width in tiles.
    pub tiles_wide: u32,
    /// Viewport height in tiles.
    pub tiles_high: u32,
    /// Seed for drop rolls.
    pub rng_seed: u64,
    /// Asset root directory.
    pub asset_root: PathBuf,
    /// Ticks between player death and respawn.
    pub respawn_delay: u64,
    /// Player lives at start.
    pub player_lives: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            updates_per_second: UPDATES_PER_SECOND,
            animation_fps: ANIMATION_FPS,
            tile_size: TILE_SIZE,
            tiles_wide: TILES_WIDE,
            tiles_high: TILES_HIGH,
            rng_seed: 0,
            asset_root: PathBuf::from("assets"),
            respawn_delay: RESPAWN_DELAY,
            player_lives: PLAYER_LIVES,
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Apply `ELEMENTAL_ASSETS`, `ELEMENTAL_SEED` and `ELEMENTAL_UPS`.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(root) = std::env::var("ELEMENTAL_ASSETS") {
            self.asset_root = PathBuf::from(root);
        }
        if let Ok(seed) = std::env::var("ELEMENTAL_SEED") {
            self.rng_seed = seed
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("ELEMENTAL_SEED is not a number: {seed}")))?;
        }
        if let Ok(ups) = std::env::var("ELEMENTAL_UPS") {
            self.updates_per_second = ups
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("ELEMENTAL_UPS is not a number: {ups}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.updates_per_second == 0 || self.animation_fps == 0 {
            return Err(ConfigError::Invalid("rates must be non-zero".into()));
        }
        if self.animation_fps > self.updates_per_second {
            return Err(ConfigError::Invalid(format!(
                "animation_fps ({}) exceeds updates_per_second ({})",
                self.animation_fps, self.updates_per_second
            )));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Update steps per animation tick.
    pub fn animation_period(&self) -> u64 {
        (self.updates_per_second / self.animation_fps.max(1)).max(1) as u64
    }

    /// Viewport size in pixels.
    pub fn viewport_px(&self) -> (f64, f64) {
        (
            (self.tiles_wide * self.tile_size) as f64,
            (self.tiles_high * self.tile_size) as f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.updates_per_second, 30);
        assert_eq!(config.animation_period(), 3);
        assert_eq!(config.viewport_px(), (960.0, 640.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sim.json");
        std::fs::write(&path, r#"{ "rng_seed": 99, "player_lives": 1 }"#).unwrap();

        let config = SimConfig::from_json_file(&path).unwrap();
        assert_eq!(config.rng_seed, 99);
        assert_eq!(config.player_lives, 1);
        assert_eq!(config.tile_size, 32);
    }

    #[test]
    fn test_json_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            SimConfig::from_json_file(tmp.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));

        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SimConfig::from_json_file(&path), Err(ConfigError::Parse(_))));

        std::fs::write(&path, r#"{ "animation_fps": 60 }"#).unwrap();
        assert!(matches!(SimConfig::from_json_file(&path), Err(ConfigError::Invalid(_))));
    }
}
