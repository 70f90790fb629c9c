use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which counter a finished game bumps
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tally {
    HumanWin,
    AiWin,
    Draw,
}

/// Win/draw counters across all games played
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchStats {
    pub human_wins: u64,
    pub ai_wins: u64,
    pub draws: u64,
}

impl MatchStats {
    pub fn total_games(&self) -> u64 {
        self.human_wins + self.ai_wins + self.draws
    }

    pub fn add(&mut self, tally: Tally) {
        match tally {
            Tally::HumanWin => self.human_wins += 1,
            Tally::AiWin => self.ai_wins += 1,
            Tally::Draw => self.draws += 1,
        }
    }

    /// Share of games ending with `tally`, in percent (0 when nothing was played)
    pub fn percent(&self, tally: Tally) -> f64 {
        let total = self.total_games();
        if total == 0 {
            return 0.0;
        }
        let count = match tally {
            Tally::HumanWin => self.human_wins,
            Tally::AiWin => self.ai_wins,
            Tally::Draw => self.draws,
        };
        count as f64 * 100.0 / total as f64
    }
}

/// A checkmate recorded on the leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    /// Display name of the winner
    pub name: String,
    /// Length of the game's move history when mate was delivered
    pub moves: u32,
    pub recorded_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, moves: u32) -> Self {
        Self {
            name: name.into(),
            moves,
            recorded_at: Utc::now(),
        }
    }
}

/// The whole stored document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Snapshot {
    pub total_moves: u64,
    pub stats: MatchStats,
    pub leaderboard: Vec<LeaderboardEntry>,
}
