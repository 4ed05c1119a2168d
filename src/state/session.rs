//! Session controller.
//!
//! Serializes everything that can change a [`GameState`]: movement intents
//! from the input layer, restart and advance requests, and the timers that
//! drive the countdown, the mud lock and the pause after a completed level.
//! The host calls [`SessionController::advance`] from its frame loop; timers
//! fire in due order inside that call, never concurrently with an intent.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::{ConfigError, GameConfig};
use super::game::{GameState, Transition};
use super::grid::{Direction, Tile};
use super::identity::{
    resolve_display_name, Celebration, CelebrationKind, IdentityProvider, ShareSink, SharedResult,
    DEFAULT_DISPLAY_NAME,
};
use super::status::{GameEvent, GameStatus};
use super::timer::{Scheduler, TimerKind};

/// Callback invoked with the new state after every applied transition.
pub type Observer = Box<dyn FnMut(&GameState)>;

/// Owns the game state for one play session.
pub struct SessionController {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler,
    rng: StdRng,
    display_name: String,
    celebration: Option<Box<dyn Celebration>>,
    observer: Option<Observer>,
    /// Bumped on every applied transition
    version: u64,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl SessionController {
    /// Start a session at level 1 with an entropy-seeded grid generator.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Start a session with a fixed seed.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new_level(&config, 1, 0, &mut rng);
        Self::with_state(config, state, rng)
    }

    /// Start a session from a prepared state.
    pub fn with_state(
        config: GameConfig,
        state: GameState,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut controller = Self {
            config,
            state,
            scheduler: Scheduler::new(),
            rng,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            celebration: None,
            observer: None,
            version: 0,
            started_at: chrono::Utc::now(),
        };
        if controller.state.status().is_timed() {
            controller
                .scheduler
                .schedule(TimerKind::Tick, controller.config.tick_interval());
        }
        log::info!(
            "Session started at level {} ({}x{}, {} bones, {}s)",
            controller.state.level(),
            controller.state.grid().width(),
            controller.state.grid().height(),
            controller.state.bones_remaining(),
            controller.state.seconds_remaining()
        );
        Ok(controller)
    }

    /// Resolve the player's name once, at session start.
    pub fn set_identity(&mut self, provider: &dyn IdentityProvider) {
        self.display_name = resolve_display_name(Some(provider));
    }

    pub fn set_celebration(&mut self, celebration: Box<dyn Celebration>) {
        self.celebration = Some(celebration);
    }

    pub fn set_observer(&mut self, observer: Observer) {
        self.observer = Some(observer);
    }

    /// Current state (read-only).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Virtual time since the session started.
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Check if a timer of `kind` is waiting to fire.
    pub fn is_timer_pending(&self, kind: TimerKind) -> bool {
        self.scheduler.is_pending(kind)
    }

    /// Player asked to move. Returns false if the move did not apply.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        self.dispatch(GameEvent::Move(direction)).is_some()
    }

    /// Player asked to continue after a completed level.
    pub fn advance_level(&mut self) -> bool {
        self.dispatch(GameEvent::AdvanceLevel).is_some()
    }

    /// Replay the current level after a loss. Returns false if the level
    /// was not lost.
    pub fn retry_level(&mut self) -> bool {
        self.dispatch(GameEvent::RetryLevel).is_some()
    }

    /// Start over from level 1.
    pub fn restart(&mut self) {
        self.dispatch(GameEvent::Restart);
    }

    /// Let `elapsed` time pass, firing every timer that falls due.
    ///
    /// Returns how many transitions applied.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let until = self.scheduler.now().saturating_add(elapsed);
        let mut applied = 0;

        while let Some(timer) = self.scheduler.pop_due(until) {
            let event = match timer.kind {
                TimerKind::Tick => GameEvent::Tick,
                TimerKind::SlowExpire => GameEvent::SlowExpire,
                TimerKind::AdvanceLevel => GameEvent::AdvanceLevel,
            };
            log::debug!("{:?} timer fired at {:?}", timer.kind, timer.due);
            if self.dispatch(event).is_some() {
                applied += 1;
            }
        }

        self.scheduler.settle(until);
        applied
    }

    /// Offer the current result to a share target.
    pub fn share(&self, sink: &mut dyn ShareSink) -> bool {
        let result = SharedResult {
            display_name: self.display_name.clone(),
            score: self.state.score(),
            level: self.state.level(),
        };
        match sink.share(result) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Sharing result failed: {}", e);
                false
            }
        }
    }

    fn dispatch(&mut self, event: GameEvent) -> Option<Transition> {
        let before = self.state.status();
        let transition = match self.state.apply(event, &self.config, &mut self.rng) {
            Ok(transition) => transition,
            Err(ignored) => {
                log::debug!("{}", ignored);
                return None;
            }
        };

        self.version += 1;
        self.reschedule(transition);
        self.report(before, transition);

        if let Some(observer) = self.observer.as_deref_mut() {
            observer(&self.state);
        }
        Some(transition)
    }

    /// Bring pending timers in line with the new state.
    fn reschedule(&mut self, transition: Transition) {
        let status = self.state.status();

        match transition {
            Transition::Advanced | Transition::Retried | Transition::Restarted => {
                // Nothing scheduled for the old grid may reach the new one.
                self.scheduler.cancel_all();
                self.scheduler
                    .schedule(TimerKind::Tick, self.config.tick_interval());
                return;
            }
            Transition::Ticked if status.is_timed() => {
                self.scheduler
                    .schedule(TimerKind::Tick, self.config.tick_interval());
            }
            Transition::Moved(outcome) if outcome.tile == Tile::Mud => {
                self.scheduler
                    .schedule(TimerKind::SlowExpire, self.config.mud_lock_duration());
            }
            _ => {}
        }

        if status == GameStatus::LevelComplete && !self.scheduler.is_pending(TimerKind::AdvanceLevel)
        {
            self.scheduler
                .schedule(TimerKind::AdvanceLevel, self.config.advance_delay());
        }

        if !status.is_timed() {
            self.scheduler.cancel_kind(TimerKind::Tick);
        }
        if status != GameStatus::Slowed {
            self.scheduler.cancel_kind(TimerKind::SlowExpire);
        }
        if status != GameStatus::LevelComplete {
            self.scheduler.cancel_kind(TimerKind::AdvanceLevel);
        }
    }

    fn report(&mut self, before: GameStatus, transition: Transition) {
        let status = self.state.status();

        match transition {
            Transition::Advanced => log::info!(
                "Level {} started ({}x{}, {} bones, {}s)",
                self.state.level(),
                self.state.grid().width(),
                self.state.grid().height(),
                self.state.bones_remaining(),
                self.state.seconds_remaining()
            ),
            Transition::Retried => log::info!("Retrying level {}", self.state.level()),
            Transition::Restarted => log::info!("Session restarted"),
            _ => {}
        }

        if status == before {
            return;
        }

        let kind = match status {
            GameStatus::LevelComplete => {
                log::info!(
                    "Level {} complete, score {}",
                    self.state.level(),
                    self.state.score()
                );
                CelebrationKind::LevelComplete
            }
            GameStatus::Won => {
                log::info!(
                    "{} won with score {}",
                    self.display_name,
                    self.state.score()
                );
                CelebrationKind::Won
            }
            GameStatus::Lost => {
                log::info!(
                    "Time ran out on level {}, score {}",
                    self.state.level(),
                    self.state.score()
                );
                return;
            }
            _ => return,
        };

        if let Some(celebration) = self.celebration.as_mut() {
            if let Err(e) = celebration.celebrate(kind) {
                log::warn!("Celebration failed: {}", e);
            }
        }
    }

    /// Convert to JSON for the presentation layer.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "display_name": self.display_name,
            "version": self.version,
            "elapsed_ms": self.scheduler.now().as_millis() as u64,
            "started_at": self.started_at.to_rfc3339(),
            "state": self.state.to_json()
        })
    }
}
