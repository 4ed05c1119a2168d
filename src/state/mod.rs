//! State management module for Bone Hunt.
//!
//! This module provides the core state types:
//!
//! - `config` - Difficulty and timing tunables
//! - `level` - Per-level parameters derived from the tunables
//! - `grid` - Tiles, positions and grid generation
//! - `status` - Game status state machine vocabulary
//! - `game` - The game state and its transitions
//! - `timer` - Fire-once, cancelable timers on a virtual clock
//! - `session` - Serializes intents and timers into transitions
//! - `identity` - Collaborator seams (identity, celebration, sharing)
//! - `leaderboard` - Top results
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        SessionController                         │
//! │                                                                  │
//! │  intents ──▶ ┌──────────────┐     ┌──────────────┐               │
//! │ (move, ...)  │   dispatch   │────▶│  GameState   │──▶ observer   │
//! │  timers ───▶ │ (one at once)│     │              │               │
//! │              └──────┬───────┘     └──────┬───────┘               │
//! │                     │                    │ new level / restart   │
//! │              ┌──────▼───────┐     ┌──────▼───────┐               │
//! │              │  Scheduler   │     │ LevelConfig  │──▶ generate   │
//! │              │ tick / slow /│     │  (GameConfig)│    (Grid)     │
//! │              │   advance    │     └──────────────┘               │
//! │              └──────────────┘                                    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod game;
pub mod grid;
pub mod identity;
pub mod leaderboard;
pub mod level;
pub mod session;
pub mod status;
pub mod timer;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use game::{GameState, MoveOutcome, Transition};
pub use grid::{generate, Direction, Grid, Position, Tile, ORIGIN};
pub use identity::{
    resolve_display_name, Celebration, CelebrationKind, CollaboratorError, IdentityProvider,
    ShareSink, SharedResult, DEFAULT_DISPLAY_NAME, FALLBACK_USERNAME,
};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LEADERBOARD_SIZE};
pub use level::LevelConfig;
pub use session::{Observer, SessionController};
pub use status::{GameEvent, GameStatus, Ignored};
pub use timer::{Scheduler, Timer, TimerId, TimerKind};
