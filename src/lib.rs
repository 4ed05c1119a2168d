//! Bone Hunt State Library
//!
//! This crate provides the game logic for Bone Hunt, a single-player grid
//! game: a dog collects bones and avoids mud against a countdown, over a
//! sequence of increasingly hard levels.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Level Generation** - Grid size, bone and mud counts and time budget
//!   derived from the level number, plus random tile placement that never
//!   touches the start cell.
//!
//! - **Game State Machine** - Movement, tile effects, countdown and
//!   win/lose detection with validated transitions.
//!
//! - **Session Control** - Serialized intents and fire-once timers for the
//!   countdown, the mud lock and the pause between levels.
//!
//! - **Collaborators** - Seams for identity lookup, celebration effects and
//!   result sharing, plus an in-memory leaderboard.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - Requests that do not apply
//!    in the current state are dropped without touching it.
//!
//! 2. **One writer** - The session controller owns the state; everyone else
//!    reads it.
//!
//! 3. **No rendering, no input devices** - Hosts translate key presses into
//!    directions and draw whatever state they are handed.
//!
//! 4. **Virtual time** - Timers run on a clock the host advances, so nothing
//!    blocks and tests are exact.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use bonehunt_state::state::{Direction, GameConfig, GameStatus, SessionController};
//!
//! let mut session = SessionController::seeded(GameConfig::default(), 7).unwrap();
//! assert_eq!(session.state().level(), 1);
//!
//! // Input layer sends directions
//! session.move_player(Direction::Right);
//!
//! // Host frame loop lets time pass
//! session.advance(Duration::from_millis(500));
//!
//! // Presentation reads the state
//! let json = session.to_json();
//! assert_eq!(json["state"]["level"], 1);
//!
//! // Run the clock out
//! session.advance(Duration::from_secs(60));
//! assert_eq!(session.state().status(), GameStatus::Lost);
//! ```

pub mod state;

pub use state::*;
