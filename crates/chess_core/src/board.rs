use cozy_chess::{File, Move, Rank};

use crate::notation::MoveText;
use crate::types::*;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// The one owner of the canonical position.
///
/// Moves are either applied completely or rejected without touching the
/// position. Every applied position is hashed so repetition can be detected
/// without the caller keeping its own history.
#[derive(Clone, Debug)]
pub struct Board {
    inner: cozy_chess::Board,
    seen: Vec<u64>,
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    pub fn startpos() -> Self {
        Self::from_inner(cozy_chess::Board::default())
    }

    /// Load a position from FEN. Repetition counting starts from this position.
    pub fn load(fen: &str) -> Result<Self, BoardError> {
        let inner =
            cozy_chess::Board::from_fen(fen.trim(), false).map_err(|e| BoardError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{e:?}"),
            })?;
        Ok(Self::from_inner(inner))
    }

    fn from_inner(inner: cozy_chess::Board) -> Self {
        let seen = vec![inner.hash()];
        Self { inner, seen }
    }

    pub fn position(&self) -> Position {
        Position::new(self.inner.to_string())
    }

    pub fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }

    pub fn halfmove_clock(&self) -> u8 {
        self.inner.halfmove_clock()
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let piece = self.inner.piece_on(sq)?;
        let color = self.inner.color_on(sq)?;
        Some((color, piece))
    }

    /// Try to play `from -> to`. Returns `None` if the move is illegal here.
    ///
    /// A pawn reaching the last rank promotes to `promotion`, or to a queen when
    /// none is given; `promotion` is ignored for every other move. Castling is
    /// requested with the king's two-square move.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Option<PlayedMove> {
        let mover = self.inner.side_to_move();
        let (color, piece) = self.piece_at(from)?;
        if color != mover || self.inner.colors(mover).has(to) {
            return None;
        }

        let promotion = if piece == Piece::Pawn && matches!(to.rank(), Rank::First | Rank::Eighth)
        {
            Some(promotion.unwrap_or(Piece::Queen))
        } else {
            None
        };

        let mv = Move {
            from,
            to: engine_target(piece, from, to),
            promotion,
        };
        if !self.inner.is_legal(mv) {
            return None;
        }
        self.inner.play_unchecked(mv);
        self.seen.push(self.inner.hash());

        Some(PlayedMove {
            from,
            to,
            promotion,
            mover,
        })
    }

    /// All legal moves of the side to move, castling in king-two-squares form.
    pub fn legal_moves(&self) -> Vec<MoveText> {
        let own = self.inner.colors(self.inner.side_to_move());
        let mut out = Vec::with_capacity(64);
        self.inner.generate_moves(|moves| {
            let piece = moves.piece;
            for mv in moves {
                let to = if piece == Piece::King && own.has(mv.to) {
                    castle_destination(mv.from, mv.to)
                } else {
                    mv.to
                };
                out.push(MoveText {
                    from: mv.from,
                    to,
                    promotion: mv.promotion,
                });
            }
            false
        });
        out
    }

    fn has_legal_move(&self) -> bool {
        let mut found = false;
        self.inner.generate_moves(|moves| {
            found = !moves.is_empty();
            found
        });
        found
    }

    /// How many times the current position has occurred since `load`.
    pub fn repetitions(&self) -> usize {
        let current = self.inner.hash();
        self.seen.iter().filter(|&&h| h == current).count()
    }

    /// `None` while the game can go on.
    pub fn terminal(&self) -> Option<Terminal> {
        if !self.has_legal_move() {
            return Some(if self.inner.checkers().is_empty() {
                Terminal::Stalemate
            } else {
                Terminal::Checkmate
            });
        }
        if insufficient_material(&self.inner) {
            return Some(Terminal::InsufficientMaterial);
        }
        if self.inner.halfmove_clock() >= 100 || self.repetitions() >= 3 {
            return Some(Terminal::RepetitionOrFiftyMove);
        }
        None
    }
}

// The rules engine encodes castling as the king capturing its own rook.
fn engine_target(piece: Piece, from: Square, to: Square) -> Square {
    if piece != Piece::King || from.file() != File::E || from.rank() != to.rank() {
        return to;
    }
    match to.file() {
        File::G => Square::new(File::H, from.rank()),
        File::C => Square::new(File::A, from.rank()),
        _ => to,
    }
}

fn castle_destination(king: Square, rook: Square) -> Square {
    let file = if (rook.file() as usize) > (king.file() as usize) {
        File::G
    } else {
        File::C
    };
    Square::new(file, king.rank())
}

fn is_light(sq: Square) -> bool {
    (sq.file() as usize + sq.rank() as usize) % 2 == 1
}

/// Bare kings, a single minor piece, or only bishops all on one square colour.
fn insufficient_material(board: &cozy_chess::Board) -> bool {
    let kings = board.pieces(Piece::King);
    let others = board.occupied() ^ kings;
    match others.len() {
        0 => true,
        1 => {
            let minors = board.pieces(Piece::Knight) | board.pieces(Piece::Bishop);
            !(others & minors).is_empty()
        }
        _ => {
            if others != board.pieces(Piece::Bishop) {
                return false;
            }
            let shades: Vec<bool> = others.into_iter().map(is_light).collect();
            shades.iter().all(|&s| s == shades[0])
        }
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
