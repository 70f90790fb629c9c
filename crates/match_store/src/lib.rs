//! Match statistics storage
//!
//! This crate provides:
//! - The [`StatsGateway`] seam the game coordinator writes through
//! - A JSON-file backend and an in-memory backend
//! - Text reports of the leaderboard and win statistics
//!
//! Every write is best-effort: callers log failures and carry on.

mod json_file;
mod memory;
pub mod report;
mod stats;

pub use json_file::*;
pub use memory::*;
pub use stats::*;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Where move counts, results and leaderboard entries go.
#[async_trait]
pub trait StatsGateway: Send + Sync {
    /// Add one to the global move counter, returning the new total.
    async fn increment_move_count(&self) -> Result<u64, PersistenceError>;

    /// Count a finished game, returning the updated tallies.
    async fn record_result(&self, tally: Tally) -> Result<MatchStats, PersistenceError>;

    async fn add_leaderboard_entry(&self, entry: LeaderboardEntry)
        -> Result<(), PersistenceError>;

    /// Everything stored, leaderboard in insertion order.
    async fn snapshot(&self) -> Result<Snapshot, PersistenceError>;

    /// Leaderboard sorted ascending by move count (fewest moves first).
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, PersistenceError> {
        let mut entries = self.snapshot().await?.leaderboard;
        entries.sort_by_key(|e| e.moves);
        Ok(entries)
    }

    async fn stats(&self) -> Result<MatchStats, PersistenceError> {
        Ok(self.snapshot().await?.stats)
    }
}
