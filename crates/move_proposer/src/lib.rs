//! Move proposals for the AI side.
//!
//! A proposer turns a position plus the moves already rejected this turn into
//! at most one candidate string. Proposers never check legality and never
//! retry; both are the caller's job.

mod chat;
mod config;
mod prompt;
mod random;

pub use chat::*;
pub use config::*;
pub use prompt::*;
pub use random::*;

use async_trait::async_trait;
use chess_core::Position;

/// Trait implemented by every source of AI moves.
#[async_trait]
pub trait MoveProposer: Send + Sync {
    /// Propose one move for `position` in coordinate form (`e2e4`, `e7e8q`).
    ///
    /// `excluded` lists the candidates already rejected during this turn.
    /// Returns `None` when no usable reply could be obtained.
    async fn propose(&self, position: &Position, excluded: &[String]) -> Option<String>;

    /// Display name used in logs and on the leaderboard
    fn name(&self) -> &str;
}
