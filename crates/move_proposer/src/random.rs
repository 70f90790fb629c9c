//! Offline proposer that plays random legal moves.
//!
//! Useful for:
//! - Playing without an API key
//! - Exercising the coordinator end to end without network access

use std::sync::Mutex;

use async_trait::async_trait;
use chess_core::{Board, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::warn;

use crate::MoveProposer;

/// Picks uniformly among the legal moves that are not excluded.
pub struct RandomProposer {
    rng: Mutex<StdRng>,
}

impl Default for RandomProposer {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomProposer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of choices, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, position: &Position, excluded: &[String]) -> Option<String> {
        let board = match Board::load(position.as_str()) {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "random proposer got an unreadable position");
                return None;
            }
        };
        let moves: Vec<String> = board
            .legal_moves()
            .iter()
            .map(|m| m.to_string())
            .filter(|m| !excluded.contains(m))
            .collect();

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        moves.choose(&mut *rng).cloned()
    }
}

#[async_trait]
impl MoveProposer for RandomProposer {
    async fn propose(&self, position: &Position, excluded: &[String]) -> Option<String> {
        self.pick(position, excluded)
    }

    fn name(&self) -> &str {
        "Random"
    }
}

#[cfg(test)]
#[path = "random_tests.rs"]
mod random_tests;
