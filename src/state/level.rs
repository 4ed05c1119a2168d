//! Per-level difficulty.
//!
//! [`LevelConfig`] is derived from a level number and a [`GameConfig`]; it is
//! never stored on its own. Difficulty only ever ramps up: the grid grows
//! (until `max_size`), mud grows, and the time budget shrinks (until
//! `min_time`).

use serde::Serialize;

use super::config::GameConfig;

/// Parameters of a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelConfig {
    pub width: u32,
    pub height: u32,
    pub bone_count: u32,
    pub mud_count: u32,
    pub time_budget_seconds: u32,
}

impl LevelConfig {
    /// Derive the parameters for `level`. Levels below 1 are treated as 1.
    pub fn for_level(config: &GameConfig, level: u32) -> Self {
        let level = level.max(1);

        let growth = (level - 1) / config.levels_per_size_increase.max(1);
        let size = config.base_size.saturating_add(growth).min(config.max_size);
        let cells = size.saturating_mul(size);

        // Keep the start cell and at least one other cell free of bones.
        let extra_bones = (f64::from(level) * config.bone_growth_rate).round() as u32;
        let bone_count = config
            .base_bones
            .saturating_add(extra_bones)
            .min(cells.saturating_sub(2));

        let extra_mud = level / config.mud_growth_divisor.max(1);
        let mud_count = config
            .base_mud
            .saturating_add(extra_mud)
            .min(cells.saturating_sub(bone_count).saturating_sub(1));

        let decay = (f64::from(level) * config.time_decay_rate).floor() as u32;
        let time_budget_seconds = config.base_time.saturating_sub(decay).max(config.min_time);

        Self {
            width: size,
            height: size,
            bone_count,
            mud_count,
            time_budget_seconds,
        }
    }

    pub fn cell_count(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }

    /// Whether generation can place every tile without touching the start cell.
    pub fn is_placeable(&self) -> bool {
        u64::from(self.bone_count) + u64::from(self.mud_count) + 1
            <= u64::from(self.cell_count())
    }
}
