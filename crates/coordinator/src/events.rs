use chess_core::Position;
use tokio::sync::mpsc;

use crate::{HistoryEntry, MatchOutcome, Side};

/// Notifications for whatever renders the game.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A move was applied (or the game restarted, with `last` empty).
    PositionChanged {
        position: Position,
        to_move: Side,
        last: Option<HistoryEntry>,
    },
    /// The AI turn started (`true`) or finished (`false`).
    AiThinking(bool),
    GameOver {
        outcome: MatchOutcome,
        message: String,
    },
    /// A rejected request, worded for the player.
    Alert(String),
}

pub type EventSender = mpsc::UnboundedSender<GameEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;
