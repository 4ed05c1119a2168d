//! In-memory leaderboard.
//!
//! Keeps the best results shared during the process lifetime. Entries are
//! only ever added; a result that does not make the cut is dropped.

use super::identity::{CollaboratorError, ShareSink, SharedResult};

/// Entries kept on the board.
pub const LEADERBOARD_SIZE: usize = 5;

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub score: u32,
    pub level: u32,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Top results by score.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::with_capacity(LEADERBOARD_SIZE)
    }
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a result. Returns its rank (0 = best) if it made the board.
    ///
    /// Higher scores rank first; equal scores keep submission order.
    pub fn submit(&mut self, result: SharedResult) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < result.score)
            .unwrap_or(self.entries.len());
        if rank >= self.capacity {
            return None;
        }

        self.entries.insert(
            rank,
            LeaderboardEntry {
                display_name: result.display_name,
                score: result.score,
                level: result.level,
                recorded_at: chrono::Utc::now(),
            },
        );
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    /// Entries, best first.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Best entry.
    pub fn best(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to JSON for sending to clients.
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .entries
            .iter()
            .enumerate()
            .map(|(rank, e)| {
                serde_json::json!({
                    "rank": rank + 1,
                    "display_name": e.display_name,
                    "score": e.score,
                    "level": e.level,
                    "recorded_at": e.recorded_at.to_rfc3339()
                })
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

impl ShareSink for Leaderboard {
    fn share(&mut self, result: SharedResult) -> Result<(), CollaboratorError> {
        let name = result.display_name.clone();
        match self.submit(result) {
            Some(rank) => log::info!("{} placed #{} on the leaderboard", name, rank + 1),
            None => log::debug!("{} did not make the leaderboard", name),
        }
        Ok(())
    }
}
