//! Plain-text board and history output.

use chess_core::{Board, Color, File, Piece, Rank, Square};
use coordinator::{MoveHistory, Side};

fn piece_char(color: Color, piece: Piece) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

/// Board from White's side, uppercase for White, `.` for empty squares.
pub fn board_diagram(board: &Board) -> String {
    let mut out = String::new();
    for rank in Rank::ALL.iter().rev() {
        out.push_str(&format!("{} ", *rank as usize + 1));
        for file in File::ALL {
            let c = board
                .piece_at(Square::new(file, *rank))
                .map(|(color, piece)| piece_char(color, piece))
                .unwrap_or('.');
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out
}

/// Numbered move list, one full move (human then AI) per line.
pub fn history_lines(history: &MoveHistory) -> Vec<String> {
    history
        .entries()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let moves: Vec<String> = pair.iter().map(|e| e.played.to_string()).collect();
            format!("{:>3}. {}", i + 1, moves.join(" "))
        })
        .collect()
}

pub fn side_label(side: Side, player: &str, ai: &str) -> String {
    match side {
        Side::Human => player.to_string(),
        Side::Ai => ai.to_string(),
    }
}
