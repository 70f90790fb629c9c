use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Failed AI candidates allowed per turn before the session gives up.
pub const MAX_AI_ATTEMPTS: u32 = 50;

/// Settings for one game session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Leaderboard name used when the human wins
    pub player_name: String,
    /// Leaderboard name used when the AI wins
    pub ai_name: String,
    pub max_ai_attempts: u32,
    /// Pause between the human's move and the AI turn
    pub ai_turn_delay_ms: u64,
    /// Upper bound on one proposer call; a timeout is a failed attempt
    pub proposal_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            ai_name: "DeepSeek".to_string(),
            max_ai_attempts: MAX_AI_ATTEMPTS,
            ai_turn_delay_ms: 500,
            proposal_timeout_ms: 30_000,
        }
    }
}

impl SessionConfig {
    pub fn ai_turn_delay(&self) -> Duration {
        Duration::from_millis(self.ai_turn_delay_ms)
    }

    pub fn proposal_timeout(&self) -> Duration {
        Duration::from_millis(self.proposal_timeout_ms)
    }
}
