use std::fmt;

pub use cozy_chess::{Color, File, Piece, Rank, Square};

/// Serialized board state (FEN). Only the [`crate::Board`] produces these.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position(String);

impl Position {
    pub(crate) fn new(fen: String) -> Self {
        Self(fen)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The side to move, read from the second FEN field.
    pub fn side_to_move(&self) -> Option<Color> {
        match self.0.split_whitespace().nth(1) {
            Some("w") => Some(Color::White),
            Some("b") => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Position {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A move the board accepted, in the coordinates it was requested with
/// (castling stays `e1g1`, not the rules engine's king-takes-rook form).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayedMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
    /// Colour of the side that made the move
    pub mover: Color,
}

impl fmt::Display for PlayedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", promotion_char(p))?;
        }
        Ok(())
    }
}

/// Why the game can no longer continue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    RepetitionOrFiftyMove,
}

pub fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        _ => 'q',
    }
}

pub fn promotion_from_char(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    }
}
