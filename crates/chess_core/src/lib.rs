//! Board authority for the chess-vs-LLM workspace.
//!
//! Owns the canonical position, applies or rejects moves under the full rules
//! of chess (via `cozy-chess`), and reports terminal conditions. Also hosts the
//! purely syntactic move-notation gate used before any legality check.

pub mod board;
pub mod notation;
pub mod types;

pub use board::{Board, BoardError};
pub use notation::{is_valid_move_syntax, parse_square, MoveText};
pub use types::*;
