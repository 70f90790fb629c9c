use chess_core::BoardError;

use crate::{MatchOutcome, Side};

/// Errors surfaced to whoever drives a [`crate::GameSession`].
///
/// None of them change the board or the history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid move {from}{to}. Please try again.")]
    IllegalMove { from: String, to: String },

    #[error("{} No more moves can be played.", .outcome.message())]
    GameAlreadyOver { outcome: MatchOutcome },

    #[error("{ai_name} failed to make a move after {attempts} attempts. Please restart the game.")]
    AiExhausted { ai_name: String, attempts: u32 },

    #[error("{ai_name} could not move in this game. Restart the game to keep playing.")]
    RestartRequired { ai_name: String },

    #[error("It is not your turn: waiting for {expected} to move")]
    OutOfTurn { expected: Side },
}

/// Errors building a session from a custom position.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("the human plays White, but this position has Black to move")]
    BlackToMove,

    #[error("this position is already over")]
    AlreadyOver,
}
