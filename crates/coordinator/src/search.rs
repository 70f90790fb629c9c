//! Bookkeeping for one AI turn.

use chess_core::PlayedMove;

/// Candidates the board rejected during the current AI turn.
///
/// Starts empty every turn and is handed to the proposer so it can avoid them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FailedMoves(Vec<String>);

impl FailedMoves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.0.iter().any(|c| c == candidate)
    }

    /// Remember a rejected candidate. Duplicates are ignored.
    pub fn push(&mut self, candidate: String) {
        if !self.contains(&candidate) {
            self.0.push(candidate);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Why a single AI attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateError {
    #[error("no reply from the proposer")]
    NoReply,
    #[error("proposer did not answer in time")]
    TimedOut,
    #[error("'{0}' is not a coordinate move")]
    Malformed(String),
    #[error("'{0}' was already rejected this turn")]
    Repeated(String),
    #[error("'{0}' is illegal in this position")]
    Illegal(String),
}

/// Progress of an AI turn.
///
/// `attempt` counts failed candidates only, so a turn that succeeds on its
/// fourth try reports 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiSearch {
    Searching { attempt: u32 },
    Found { played: PlayedMove, attempt: u32 },
    Exhausted { attempts: u32 },
}

impl AiSearch {
    pub fn start(budget: u32) -> Self {
        if budget == 0 {
            AiSearch::Exhausted { attempts: 0 }
        } else {
            AiSearch::Searching { attempt: 0 }
        }
    }

    /// Fold one attempt's verdict into the state. `Found` and `Exhausted` absorb.
    pub fn step(self, verdict: Result<PlayedMove, CandidateError>, budget: u32) -> Self {
        match self {
            AiSearch::Searching { attempt } => match verdict {
                Ok(played) => AiSearch::Found { played, attempt },
                Err(_) => {
                    let attempt = attempt + 1;
                    if attempt >= budget {
                        AiSearch::Exhausted { attempts: attempt }
                    } else {
                        AiSearch::Searching { attempt }
                    }
                }
            },
            done => done,
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, AiSearch::Searching { .. })
    }
}
