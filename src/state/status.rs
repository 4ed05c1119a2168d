//! Game status state machine.
//!
//! # State Diagram
//!
//! ```text
//! ┌─────────┐   onto mud    ┌────────┐
//! │ Playing │──────────────▶│ Slowed │
//! │         │◀──────────────│        │
//! └────┬────┘  slow expires └───┬────┘
//!      │                        │
//!      │ tick hits zero         │ tick hits zero
//!      ├────────────────┬───────┘
//!      │                ▼
//!      │           ┌────────┐  retry level
//!      │           │  Lost  │───────────────▶ Playing (same level, score 0)
//!      │           └────────┘
//!      │ last bone
//!      ├── level < max ──▶ LevelComplete ── advance ──▶ Playing (next level)
//!      └── level == max ─▶ Won
//!
//! restart: any state ──▶ Playing (level 1, score 0)
//! ```

use std::fmt;

use serde::Serialize;

use super::grid::Direction;

/// Game state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Accepting moves, clock running
    #[default]
    Playing,
    /// Stuck in mud; moves rejected, clock running
    Slowed,
    /// All bones of a non-final level collected
    LevelComplete,
    /// All bones of the final level collected
    Won,
    /// Clock ran out
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Slowed => "slowed",
            Self::LevelComplete => "level_complete",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Check if the clock is running.
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Playing | Self::Slowed)
    }

    /// Check if moves are accepted.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Check if the session is over (only restart or a retry leaves this state).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "Playing"),
            Self::Slowed => write!(f, "Slowed"),
            Self::LevelComplete => write!(f, "LevelComplete"),
            Self::Won => write!(f, "Won"),
            Self::Lost => write!(f, "Lost"),
        }
    }
}

/// State transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Tick,
    Move(Direction),
    SlowExpire,
    AdvanceLevel,
    RetryLevel,
    Restart,
}

/// A transition request that did not apply.
///
/// Rejected requests leave the state untouched. They are not errors: the
/// session controller logs and drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ignored {
    pub from: GameStatus,
    pub event: GameEvent,
    pub reason: &'static str,
}

impl Ignored {
    pub fn new(from: GameStatus, event: GameEvent, reason: &'static str) -> Self {
        Self {
            from,
            event,
            reason,
        }
    }
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ignored {:?} while {}: {}",
            self.event, self.from, self.reason
        )
    }
}
