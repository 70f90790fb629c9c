//! Coordinate move notation (`e2e4`, `e7e8q`).
//!
//! [`is_valid_move_syntax`] is the cheap gate every proposed move passes before
//! the board is asked about legality. It never looks at a position.

use std::fmt;

use crate::types::{promotion_char, promotion_from_char, Piece, Square};

fn is_file(c: char) -> bool {
    ('a'..='h').contains(&c)
}

fn is_rank(c: char) -> bool {
    ('1'..='8').contains(&c)
}

/// True iff `candidate` is 4 or 5 characters long and characters 0-1 and 2-3
/// each name a square (file a-h, rank 1-8). A fifth character is ignored.
pub fn is_valid_move_syntax(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    if !(4..=5).contains(&chars.len()) {
        return false;
    }
    is_file(chars[0]) && is_rank(chars[1]) && is_file(chars[2]) && is_rank(chars[3])
}

/// Parse a two-character square name such as `e4`.
pub fn parse_square(text: &str) -> Option<Square> {
    let mut chars = text.chars();
    let (f, r) = (chars.next()?, chars.next()?);
    if chars.next().is_some() || !is_file(f) || !is_rank(r) {
        return None;
    }
    text.parse().ok()
}

/// A syntactically valid coordinate move, not yet checked against any position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveText {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl MoveText {
    /// Split a candidate into origin, destination and optional promotion piece.
    /// An unknown fifth character reads as "no promotion given".
    pub fn parse(candidate: &str) -> Option<Self> {
        if !is_valid_move_syntax(candidate) {
            return None;
        }
        let chars: Vec<char> = candidate.chars().collect();
        let from: String = chars[0..2].iter().collect();
        let to: String = chars[2..4].iter().collect();
        Some(Self {
            from: parse_square(&from)?,
            to: parse_square(&to)?,
            promotion: chars.get(4).copied().and_then(promotion_from_char),
        })
    }
}

impl fmt::Display for MoveText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", promotion_char(p))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
