//! Game tunables.
//!
//! Every constant that shapes difficulty lives in [`GameConfig`]. Hosts can
//! keep the defaults, tweak fields in code, or load a JSON document where
//! missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Difficulty and timing tunables for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid side length at level 1
    pub base_size: u32,

    /// Largest grid side length
    pub max_size: u32,

    /// Levels between each +1 to the grid side
    pub levels_per_size_increase: u32,

    /// Bones at level 0 (before growth is applied)
    pub base_bones: u32,

    /// Extra bones per level (rounded)
    pub bone_growth_rate: f64,

    /// Mud tiles before growth is applied
    pub base_mud: u32,

    /// One extra mud tile every this many levels
    pub mud_growth_divisor: u32,

    /// Time budget before decay, in seconds
    pub base_time: u32,

    /// Time budget floor, in seconds
    pub min_time: u32,

    /// Seconds removed from the budget per level (floored)
    pub time_decay_rate: f64,

    /// How long stepping into mud locks movement
    pub mud_lock_duration_ms: u64,

    /// Last level; clearing it wins the game
    pub max_level: u32,

    /// Countdown resolution
    pub tick_interval_ms: u64,

    /// Pause between a completed level and the next one
    pub advance_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_size: 5,
            max_size: 10,
            levels_per_size_increase: 5,
            base_bones: 3,
            bone_growth_rate: 0.5,
            base_mud: 3,
            mud_growth_divisor: 2,
            base_time: 29,
            min_time: 10,
            time_decay_rate: 1.0,
            mud_lock_duration_ms: 300,
            max_level: 69,
            tick_interval_ms: 1000,
            advance_delay_ms: 1500,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the level formulas stay well defined for every level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_size < 2 {
            return Err(ConfigError::GridTooSmall(self.base_size));
        }
        if self.max_size < self.base_size {
            return Err(ConfigError::MaxSizeBelowBase {
                base: self.base_size,
                max: self.max_size,
            });
        }
        if self.levels_per_size_increase == 0 {
            return Err(ConfigError::ZeroDivisor("levels_per_size_increase"));
        }
        if self.mud_growth_divisor == 0 {
            return Err(ConfigError::ZeroDivisor("mud_growth_divisor"));
        }
        if self.base_bones == 0 {
            return Err(ConfigError::NoBones);
        }
        for (name, rate) in [
            ("bone_growth_rate", self.bone_growth_rate),
            ("time_decay_rate", self.time_decay_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::InvalidRate { name, value: rate });
            }
        }
        if self.min_time == 0 {
            return Err(ConfigError::NoTime);
        }
        if self.max_level == 0 {
            return Err(ConfigError::NoLevels);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDivisor("tick_interval_ms"));
        }
        Ok(())
    }

    pub fn mud_lock_duration(&self) -> Duration {
        Duration::from_millis(self.mud_lock_duration_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

/// Config errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Grid side {0} is too small, need at least 2")]
    GridTooSmall(u32),

    #[error("max_size {max} is below base_size {base}")]
    MaxSizeBelowBase { base: u32, max: u32 },

    #[error("{0} must be non-zero")]
    ZeroDivisor(&'static str),

    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("Every level needs at least one bone")]
    NoBones,

    #[error("min_time must be at least one second")]
    NoTime,

    #[error("max_level must be at least 1")]
    NoLevels,
}
