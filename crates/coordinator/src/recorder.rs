//! Fire-and-forget statistics writes.

use std::future::Future;
use std::sync::Arc;

use match_store::{LeaderboardEntry, PersistenceError, StatsGateway, Tally};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawns gateway writes as background tasks.
///
/// Callers never wait on a write and never see its error; failures are
/// logged. Dropping the recorder detaches pending writes rather than
/// aborting them.
pub struct Recorder {
    gateway: Arc<dyn StatsGateway>,
    pending: Vec<JoinHandle<()>>,
}

impl Recorder {
    pub fn new(gateway: Arc<dyn StatsGateway>) -> Self {
        Self {
            gateway,
            pending: Vec::new(),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn StatsGateway> {
        &self.gateway
    }

    pub fn move_played(&mut self) {
        let gateway = self.gateway.clone();
        self.dispatch("move count", async move {
            let total = gateway.increment_move_count().await?;
            debug!(total, "move count updated");
            Ok(())
        });
    }

    /// Record a finished game, plus its leaderboard line for a decisive result.
    pub fn game_over(&mut self, tally: Tally, winner: Option<LeaderboardEntry>) {
        if let Some(entry) = winner {
            let gateway = self.gateway.clone();
            self.dispatch("leaderboard entry", async move {
                gateway.add_leaderboard_entry(entry).await
            });
        }
        let gateway = self.gateway.clone();
        self.dispatch("match result", async move {
            gateway.record_result(tally).await.map(|_| ())
        });
    }

    /// Wait for every outstanding write. Used at shutdown and in tests.
    pub async fn settle(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "persistence task did not complete");
            }
        }
    }

    fn dispatch<F>(&mut self, what: &'static str, write: F)
    where
        F: Future<Output = Result<(), PersistenceError>> + Send + 'static,
    {
        let task = async move {
            if let Err(e) = write.await {
                warn!(error = %e, write = what, "persistence write failed");
            }
        };
        match Handle::try_current() {
            Ok(handle) => {
                self.pending.retain(|h| !h.is_finished());
                self.pending.push(handle.spawn(task));
            }
            Err(_) => warn!(write = what, "no async runtime, persistence write dropped"),
        }
    }
}
