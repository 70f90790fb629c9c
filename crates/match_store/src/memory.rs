use std::sync::Mutex;

use async_trait::async_trait;

use crate::stats::{LeaderboardEntry, MatchStats, Snapshot, Tally};
use crate::{PersistenceError, StatsGateway};

/// Keeps everything in process memory.
///
/// [`MemoryStore::unavailable`] builds a store whose every call fails, which is
/// how tests check that storage trouble never reaches the game.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Snapshot>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            state: Mutex::new(Snapshot::default()),
            unavailable: true,
        }
    }

    fn update<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> Result<T, PersistenceError> {
        if self.unavailable {
            return Err(PersistenceError::Unavailable("memory store disabled".into()));
        }
        let mut state = self.state.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(f(&mut state))
    }
}

#[async_trait]
impl StatsGateway for MemoryStore {
    async fn increment_move_count(&self) -> Result<u64, PersistenceError> {
        self.update(|s| {
            s.total_moves += 1;
            s.total_moves
        })
    }

    async fn record_result(&self, tally: Tally) -> Result<MatchStats, PersistenceError> {
        self.update(|s| {
            s.stats.add(tally);
            s.stats
        })
    }

    async fn add_leaderboard_entry(
        &self,
        entry: LeaderboardEntry,
    ) -> Result<(), PersistenceError> {
        self.update(|s| s.leaderboard.push(entry))
    }

    async fn snapshot(&self) -> Result<Snapshot, PersistenceError> {
        self.update(|s| s.clone())
    }
}
