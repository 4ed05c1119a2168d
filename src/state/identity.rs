//! Collaborator seams.
//!
//! Identity lookup, celebration effects and result sharing live outside the
//! core. None of them can affect game state: failures are logged and dropped.

use serde::Serialize;
use thiserror::Error;

/// Name shown when the identity provider has nothing for us.
pub const DEFAULT_DISPLAY_NAME: &str = "You";

/// Alternate default used by hosts that post results under a handle.
pub const FALLBACK_USERNAME: &str = "unknownking";

/// Collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    #[error("{collaborator} failed: {message}")]
    Failed {
        collaborator: &'static str,
        message: String,
    },
}

/// Looks up who is playing.
pub trait IdentityProvider {
    /// `Ok(None)` when the host has no signed-in user.
    fn display_name(&self) -> Result<Option<String>, CollaboratorError>;
}

/// Why a celebration fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationKind {
    LevelComplete,
    Won,
}

/// Fire-and-forget effect (confetti and the like).
pub trait Celebration {
    fn celebrate(&mut self, kind: CelebrationKind) -> Result<(), CollaboratorError>;
}

/// A result offered to a share target or leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedResult {
    pub display_name: String,
    pub score: u32,
    pub level: u32,
}

/// Accepts shared results.
pub trait ShareSink {
    fn share(&mut self, result: SharedResult) -> Result<(), CollaboratorError>;
}

/// Resolve the player's display name, falling back to [`DEFAULT_DISPLAY_NAME`].
pub fn resolve_display_name(provider: Option<&dyn IdentityProvider>) -> String {
    let Some(provider) = provider else {
        return DEFAULT_DISPLAY_NAME.to_string();
    };

    match provider.display_name() {
        Ok(Some(name)) if !name.trim().is_empty() => name,
        Ok(_) => DEFAULT_DISPLAY_NAME.to_string(),
        Err(e) => {
            log::warn!("Identity lookup failed, using default name: {}", e);
            DEFAULT_DISPLAY_NAME.to_string()
        }
    }
}
