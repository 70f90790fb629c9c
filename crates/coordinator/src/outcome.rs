use chess_core::Terminal;
use match_store::Tally;

use crate::Side;

/// State of the match. Leaves `Live` at most once and never returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Live,
    Checkmate { winner: Side },
    Stalemate,
    DrawInsufficientMaterial,
    /// Threefold repetition or the fifty-move rule
    DrawRepetitionOrFiftyMove,
}

impl MatchOutcome {
    /// Map a board end state to an outcome. `last_mover` delivered the final move,
    /// so on checkmate it is the winner.
    pub fn from_terminal(terminal: Terminal, last_mover: Side) -> Self {
        match terminal {
            Terminal::Checkmate => MatchOutcome::Checkmate { winner: last_mover },
            Terminal::Stalemate => MatchOutcome::Stalemate,
            Terminal::InsufficientMaterial => MatchOutcome::DrawInsufficientMaterial,
            Terminal::RepetitionOrFiftyMove => MatchOutcome::DrawRepetitionOrFiftyMove,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, MatchOutcome::Live)
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            MatchOutcome::Stalemate
                | MatchOutcome::DrawInsufficientMaterial
                | MatchOutcome::DrawRepetitionOrFiftyMove
        )
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchOutcome::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }

    /// Which statistics counter a finished game bumps.
    pub fn tally(&self) -> Option<Tally> {
        match self {
            MatchOutcome::Live => None,
            MatchOutcome::Checkmate { winner: Side::Human } => Some(Tally::HumanWin),
            MatchOutcome::Checkmate { winner: Side::Ai } => Some(Tally::AiWin),
            _ => Some(Tally::Draw),
        }
    }

    /// Text shown to the player when the game ends.
    pub fn message(&self) -> &'static str {
        match self {
            MatchOutcome::Live => "Game in progress",
            MatchOutcome::Checkmate { winner: Side::Human } => "Checkmate! You win!",
            MatchOutcome::Checkmate { winner: Side::Ai } => "Checkmate! AI wins!",
            MatchOutcome::Stalemate => "Stalemate! It's a draw.",
            MatchOutcome::DrawInsufficientMaterial => "Draw due to insufficient material.",
            MatchOutcome::DrawRepetitionOrFiftyMove => "Draw due to threefold repetition or 50-move rule.",
        }
    }
}
