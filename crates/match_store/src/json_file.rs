//! Single-document JSON storage on the local disk

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::stats::{LeaderboardEntry, MatchStats, Snapshot, Tally};
use crate::{PersistenceError, StatsGateway};

/// Where the JSON document lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("match_stats.json"),
        }
    }
}

/// Stores the [`Snapshot`] as one pretty-printed JSON file.
///
/// Each write is a read-modify-write under an async mutex, so writes from one
/// process never interleave. A missing file reads as an empty snapshot.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Snapshot, PersistenceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        // Write beside the target, then rename over it
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "stats document written");
        Ok(())
    }

    async fn update<T>(
        &self,
        f: impl FnOnce(&mut Snapshot) -> T + Send,
    ) -> Result<T, PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let out = f(&mut snapshot);
        self.save(&snapshot).await?;
        Ok(out)
    }
}

#[async_trait]
impl StatsGateway for JsonFileStore {
    async fn increment_move_count(&self) -> Result<u64, PersistenceError> {
        self.update(|s| {
            s.total_moves += 1;
            s.total_moves
        })
        .await
    }

    async fn record_result(&self, tally: Tally) -> Result<MatchStats, PersistenceError> {
        self.update(|s| {
            s.stats.add(tally);
            s.stats
        })
        .await
    }

    async fn add_leaderboard_entry(
        &self,
        entry: LeaderboardEntry,
    ) -> Result<(), PersistenceError> {
        self.update(|s| s.leaderboard.push(entry)).await
    }

    async fn snapshot(&self) -> Result<Snapshot, PersistenceError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
}
