//! Game state management.
//!
//! [`GameState`] is the single mutable record of a play session: grid, player
//! position, score, clock and status. It changes only through the transitions
//! below, and is rebuilt wholesale when a level advances or the game restarts.

use rand::Rng;

use super::config::GameConfig;
use super::grid::{self, Direction, Grid, Position, Tile, ORIGIN};
use super::level::LevelConfig;
use super::status::{GameEvent, GameStatus, Ignored};

/// Result of a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    /// Tile that was at `to` before the move
    pub tile: Tile,
}

/// An applied transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ticked,
    Moved(MoveOutcome),
    SlowExpired,
    Advanced,
    Retried,
    Restarted,
}

/// Game session state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    level: u32,
    max_level: u32,
    level_config: LevelConfig,
    grid: Grid,
    player_position: Position,
    bones_remaining: u32,
    score: u32,
    seconds_remaining: u32,
    status: GameStatus,
    slowed: bool,
}

impl GameState {
    /// Start `level` on a freshly generated grid, carrying `score` over.
    pub fn new_level<R: Rng + ?Sized>(
        config: &GameConfig,
        level: u32,
        score: u32,
        rng: &mut R,
    ) -> Self {
        let level_config = LevelConfig::for_level(config, level);
        let grid = grid::generate(&level_config, rng);
        Self::with_grid(config, level, grid, score)
    }

    /// Start `level` on a prepared grid.
    ///
    /// Bones to collect are counted from the grid; the time budget still
    /// comes from the level config. The grid's size may differ from the
    /// level's.
    ///
    /// # Panics
    ///
    /// If the start cell is not empty or the grid holds no bones.
    pub fn with_grid(config: &GameConfig, level: u32, grid: Grid, score: u32) -> Self {
        assert_eq!(
            grid.get(ORIGIN),
            Some(Tile::Empty),
            "start cell must be empty"
        );
        assert!(grid.count(Tile::Bone) > 0, "grid has no bones to collect");

        let level = level.max(1);
        let level_config = LevelConfig::for_level(config, level);
        Self {
            level,
            max_level: config.max_level,
            level_config,
            bones_remaining: grid.count(Tile::Bone),
            grid,
            player_position: ORIGIN,
            score,
            seconds_remaining: level_config.time_budget_seconds,
            status: GameStatus::Playing,
            slowed: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn level_config(&self) -> &LevelConfig {
        &self.level_config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_position(&self) -> Position {
        self.player_position
    }

    pub fn bones_remaining(&self) -> u32 {
        self.bones_remaining
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_slowed(&self) -> bool {
        self.slowed
    }

    /// Check if this is the last level; clearing it wins the game.
    pub fn is_final_level(&self) -> bool {
        self.level >= self.max_level
    }

    /// Apply an event. Randomness is only drawn when a new grid is built.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        event: GameEvent,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Transition, Ignored> {
        match event {
            GameEvent::Tick => self.tick().map(|_| Transition::Ticked),
            GameEvent::Move(direction) => self.move_player(direction).map(Transition::Moved),
            GameEvent::SlowExpire => self.expire_slow().map(|_| Transition::SlowExpired),
            GameEvent::AdvanceLevel => self
                .advance_level(config, rng)
                .map(|_| Transition::Advanced),
            GameEvent::RetryLevel => self
                .retry_level(config, rng)
                .map(|_| Transition::Retried),
            GameEvent::Restart => {
                self.restart(config, rng);
                Ok(Transition::Restarted)
            }
        }
    }

    /// One second passes.
    pub fn tick(&mut self) -> Result<(), Ignored> {
        if !self.status.is_timed() {
            return Err(self.ignored(GameEvent::Tick, "Clock is stopped"));
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.status = GameStatus::Lost;
            self.slowed = false;
        }
        Ok(())
    }

    /// Move one step, applying the effect of the tile stepped on.
    pub fn move_player(&mut self, direction: Direction) -> Result<MoveOutcome, Ignored> {
        let event = GameEvent::Move(direction);
        match self.status {
            GameStatus::Playing => {}
            GameStatus::Slowed => return Err(self.ignored(event, "Stuck in mud")),
            _ => return Err(self.ignored(event, "Not playing")),
        }

        let from = self.player_position;
        let to = from.step(direction, self.grid.width(), self.grid.height());
        if to == from {
            return Err(self.ignored(event, "Blocked by wall"));
        }

        let tile = self.grid.get(to).unwrap_or_default();
        self.player_position = to;

        match tile {
            Tile::Bone => {
                self.grid.collect_bone(to);
                self.score += 1;
                self.bones_remaining = self.bones_remaining.saturating_sub(1);
                if self.bones_remaining == 0 {
                    self.status = if self.is_final_level() {
                        GameStatus::Won
                    } else {
                        GameStatus::LevelComplete
                    };
                }
            }
            Tile::Mud => {
                self.status = GameStatus::Slowed;
                self.slowed = true;
            }
            Tile::Empty => {}
        }

        Ok(MoveOutcome { from, to, tile })
    }

    /// Mud lock ran out.
    pub fn expire_slow(&mut self) -> Result<(), Ignored> {
        if self.status != GameStatus::Slowed {
            return Err(self.ignored(GameEvent::SlowExpire, "Not slowed"));
        }
        self.status = GameStatus::Playing;
        self.slowed = false;
        Ok(())
    }

    /// Move on to the next level, keeping the score.
    pub fn advance_level<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<(), Ignored> {
        if self.status != GameStatus::LevelComplete {
            return Err(self.ignored(GameEvent::AdvanceLevel, "Level not complete"));
        }
        *self = Self::new_level(config, self.level + 1, self.score, rng);
        Ok(())
    }

    /// Replay the lost level on a fresh grid with a zero score.
    pub fn retry_level<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<(), Ignored> {
        if self.status != GameStatus::Lost {
            return Err(self.ignored(GameEvent::RetryLevel, "Level not lost"));
        }
        *self = Self::new_level(config, self.level, 0, rng);
        Ok(())
    }

    /// Back to level 1 with a zero score. Valid from any state.
    pub fn restart<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        *self = Self::new_level(config, 1, 0, rng);
    }

    fn ignored(&self, event: GameEvent, reason: &'static str) -> Ignored {
        Ignored::new(self.status, event, reason)
    }

    /// Convert to JSON for the presentation layer.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "level": self.level,
            "max_level": self.max_level,
            "grid": self.grid.to_json(),
            "player": self.player_position.to_json(),
            "bones_needed": self.level_config.bone_count,
            "bones_remaining": self.bones_remaining,
            "score": self.score,
            "seconds_remaining": self.seconds_remaining,
            "status": self.status.as_str(),
            "slowed": self.slowed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::state::grid::Tile::{Bone as B, Empty as E, Mud as M};

    fn make_state(level: u32, max_level: u32, rows: Vec<Vec<Tile>>) -> GameState {
        let config = GameConfig {
            max_level,
            ..GameConfig::default()
        };
        GameState::with_grid(&config, level, Grid::from_rows(rows), 0)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_with_grid() {
        let state = make_state(1, 3, vec![vec![E, B, B], vec![M, E, E]]);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.bones_remaining(), 2);
        assert_eq!(state.seconds_remaining(), 28);
        assert_eq!(state.player_position(), ORIGIN);
        assert!(!state.is_slowed());
    }

    #[test]
    fn test_move_into_wall_is_noop() {
        let mut state = make_state(1, 3, vec![vec![E, B], vec![E, E]]);
        let before = state.clone();

        for _ in 0..3 {
            let err = state.move_player(Direction::Up).unwrap_err();
            assert_eq!(err.reason, "Blocked by wall");
            assert_eq!(state, before);
        }
        assert!(state.move_player(Direction::Left).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_onto_empty() {
        let mut state = make_state(1, 3, vec![vec![E, E], vec![B, E]]);
        let outcome = state.move_player(Direction::Right).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome {
                from: ORIGIN,
                to: Position::new(1, 0),
                tile: Tile::Empty,
            }
        );
        assert_eq!(state.player_position(), Position::new(1, 0));
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_collect_bone() {
        let mut state = make_state(1, 3, vec![vec![E, B, B]]);
        state.move_player(Direction::Right).unwrap();

        assert_eq!(state.score(), 1);
        assert_eq!(state.bones_remaining(), 1);
        assert_eq!(state.grid().get(Position::new(1, 0)), Some(Tile::Empty));
        assert_eq!(state.status(), GameStatus::Playing);

        // Stepping back over the cleared cell scores nothing.
        state.move_player(Direction::Left).unwrap();
        state.move_player(Direction::Right).unwrap();
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_last_bone_completes_level() {
        let mut state = make_state(1, 3, vec![vec![E, B, B]]);
        state.move_player(Direction::Right).unwrap();
        state.move_player(Direction::Right).unwrap();

        assert_eq!(state.bones_remaining(), 0);
        assert_eq!(state.score(), 2);
        assert_eq!(state.status(), GameStatus::LevelComplete);
    }

    #[test]
    fn test_last_bone_on_final_level_wins() {
        let mut state = make_state(3, 3, vec![vec![E, B]]);
        assert!(state.is_final_level());
        state.move_player(Direction::Right).unwrap();
        assert_eq!(state.status(), GameStatus::Won);

        // Terminal: nothing but restart applies.
        assert!(state.move_player(Direction::Left).is_err());
        assert!(state.tick().is_err());
        assert!(state.advance_level(&GameConfig::default(), &mut rng()).is_err());
    }

    #[test]
    fn test_mud_slows_and_is_not_consumed() {
        let mut state = make_state(1, 3, vec![vec![E, M, B]]);
        let outcome = state.move_player(Direction::Right).unwrap();
        assert_eq!(outcome.tile, Tile::Mud);
        assert_eq!(state.status(), GameStatus::Slowed);
        assert!(state.is_slowed());

        let err = state.move_player(Direction::Right).unwrap_err();
        assert_eq!(err.reason, "Stuck in mud");
        assert_eq!(state.player_position(), Position::new(1, 0));

        state.expire_slow().unwrap();
        assert_eq!(state.status(), GameStatus::Playing);
        assert!(!state.is_slowed());
        assert_eq!(state.grid().get(Position::new(1, 0)), Some(Tile::Mud));

        // Revisiting re-triggers the slow.
        state.move_player(Direction::Left).unwrap();
        state.move_player(Direction::Right).unwrap();
        assert_eq!(state.status(), GameStatus::Slowed);
    }

    #[test]
    fn test_expire_slow_outside_slowed_is_noop() {
        let mut state = make_state(1, 3, vec![vec![E, B]]);
        let before = state.clone();
        assert!(state.expire_slow().is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_ticks_until_lost() {
        let mut state = make_state(1, 3, vec![vec![E, B]]);
        let budget = state.seconds_remaining();

        for _ in 0..budget - 1 {
            state.tick().unwrap();
            assert_eq!(state.status(), GameStatus::Playing);
        }
        state.tick().unwrap();
        assert_eq!(state.seconds_remaining(), 0);
        assert_eq!(state.status(), GameStatus::Lost);
        assert!(state.tick().is_err());
    }

    #[test]
    fn test_tick_while_slowed() {
        let mut state = make_state(1, 3, vec![vec![E, M, B]]);
        state.move_player(Direction::Right).unwrap();
        state.tick().unwrap();
        assert_eq!(state.status(), GameStatus::Slowed);
        assert_eq!(state.seconds_remaining(), 27);
    }

    #[test]
    fn test_lost_while_slowed_ignores_expiry() {
        let mut state = make_state(1, 3, vec![vec![E, M, B]]);
        state.move_player(Direction::Right).unwrap();
        while state.status() != GameStatus::Lost {
            state.tick().unwrap();
        }
        assert!(!state.is_slowed());
        assert!(state.expire_slow().is_err());
        assert_eq!(state.status(), GameStatus::Lost);
    }

    #[test]
    fn test_completed_level_stops_clock() {
        let mut state = make_state(1, 3, vec![vec![E, B]]);
        for _ in 0..27 {
            state.tick().unwrap();
        }
        assert_eq!(state.seconds_remaining(), 1);

        state.move_player(Direction::Right).unwrap();
        assert_eq!(state.status(), GameStatus::LevelComplete);
        assert!(state.tick().is_err());
        assert_eq!(state.status(), GameStatus::LevelComplete);
    }

    #[test]
    fn test_advance_level_keeps_score() {
        let config = GameConfig::default();
        let mut state = make_state(1, config.max_level, vec![vec![E, B]]);
        state.move_player(Direction::Right).unwrap();

        state.advance_level(&config, &mut rng()).unwrap();

        let expected = LevelConfig::for_level(&config, 2);
        assert_eq!(state.level(), 2);
        assert_eq!(state.score(), 1);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.player_position(), ORIGIN);
        assert_eq!(state.bones_remaining(), expected.bone_count);
        assert_eq!(state.seconds_remaining(), expected.time_budget_seconds);
        assert_eq!(state.grid().width(), expected.width);
        assert!(!state.is_slowed());
    }

    #[test]
    fn test_advance_level_requires_completion() {
        let config = GameConfig::default();
        let mut state = make_state(1, config.max_level, vec![vec![E, B]]);
        let before = state.clone();
        let err = state.advance_level(&config, &mut rng()).unwrap_err();
        assert_eq!(err.from, GameStatus::Playing);
        assert_eq!(state, before);
    }

    #[test]
    fn test_restart_from_any_state() {
        let config = GameConfig::default();
        let level_one = LevelConfig::for_level(&config, 1);
        let mut rng = rng();

        let mut lost = make_state(4, 69, vec![vec![E, B]]);
        while lost.tick().is_ok() {}
        let mut won = make_state(69, 69, vec![vec![E, B]]);
        won.move_player(Direction::Right).unwrap();
        let mut slowed = make_state(2, 69, vec![vec![E, M, B]]);
        slowed.move_player(Direction::Right).unwrap();

        for mut state in [lost, won, slowed] {
            state.apply(GameEvent::Restart, &config, &mut rng).unwrap();
            assert_eq!(state.level(), 1);
            assert_eq!(state.score(), 0);
            assert_eq!(state.status(), GameStatus::Playing);
            assert_eq!(state.player_position(), ORIGIN);
            assert_eq!(*state.level_config(), level_one);
            assert_eq!(state.grid().count(Tile::Bone), level_one.bone_count);
            assert_eq!(state.grid().count(Tile::Mud), level_one.mud_count);
        }
    }

    #[test]
    fn test_retry_level_after_loss() {
        let config = GameConfig::default();
        let level_three = LevelConfig::for_level(&config, 3);
        let mut state = GameState::with_grid(&config, 3, Grid::from_rows(vec![vec![E, B, B]]), 7);
        state.move_player(Direction::Right).unwrap();
        while state.tick().is_ok() {}
        assert_eq!(state.status(), GameStatus::Lost);

        state
            .apply(GameEvent::RetryLevel, &config, &mut rng())
            .unwrap();

        assert_eq!(state.level(), 3);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.player_position(), ORIGIN);
        assert_eq!(state.seconds_remaining(), level_three.time_budget_seconds);
        assert_eq!(*state.level_config(), level_three);
        assert_eq!(state.grid().count(Tile::Bone), level_three.bone_count);
    }

    #[test]
    fn test_retry_level_requires_loss() {
        let config = GameConfig::default();
        let mut state = make_state(2, 3, vec![vec![E, B]]);
        let before = state.clone();
        let err = state.retry_level(&config, &mut rng()).unwrap_err();
        assert_eq!(err.reason, "Level not lost");
        assert_eq!(state, before);
    }

    #[test]
    #[should_panic(expected = "no bones")]
    fn test_with_grid_rejects_boneless_grid() {
        make_state(1, 3, vec![vec![E, M]]);
    }

    #[test]
    #[should_panic(expected = "start cell")]
    fn test_with_grid_rejects_occupied_start() {
        make_state(1, 3, vec![vec![B, B]]);
    }

    #[test]
    fn test_apply_dispatch() {
        let config = GameConfig::default();
        let mut state = make_state(1, 3, vec![vec![E, M, B]]);
        let mut rng = rng();

        assert_eq!(
            state.apply(GameEvent::Tick, &config, &mut rng),
            Ok(Transition::Ticked)
        );
        assert!(matches!(
            state.apply(GameEvent::Move(Direction::Right), &config, &mut rng),
            Ok(Transition::Moved(MoveOutcome { tile: Tile::Mud, .. }))
        ));
        assert_eq!(
            state.apply(GameEvent::SlowExpire, &config, &mut rng),
            Ok(Transition::SlowExpired)
        );
        assert!(state
            .apply(GameEvent::AdvanceLevel, &config, &mut rng)
            .is_err());
    }

    #[test]
    fn test_to_json() {
        let state = make_state(1, 3, vec![vec![E, B]]);
        let json = state.to_json();
        assert_eq!(json["status"], "playing");
        assert_eq!(json["bones_remaining"], 1);
        assert_eq!(json["player"], serde_json::json!({"x": 0, "y": 0}));
        assert_eq!(json["grid"], serde_json::json!([["empty", "bone"]]));
    }
}
