//! Game coordination for human vs AI chess.
//!
//! The [`GameSession`] owns the board, the move history and the match outcome.
//! Human moves are checked and applied synchronously; the AI turn asks a
//! [`move_proposer::MoveProposer`] for candidates until one is legal or the
//! attempt budget runs out. Statistics are written through a
//! [`match_store::StatsGateway`] without ever blocking play.

mod config;
mod error;
mod events;
mod history;
mod outcome;
mod recorder;
mod search;
mod session;

pub use config::*;
pub use error::*;
pub use events::*;
pub use history::*;
pub use outcome::*;
pub use recorder::Recorder;
pub use search::*;
pub use session::*;
