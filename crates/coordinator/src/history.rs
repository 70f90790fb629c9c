use std::fmt;

use chess_core::{Color, PlayedMove};

/// The two participants. The human always plays White.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Human,
    Ai,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Human => Side::Ai,
            Side::Ai => Side::Human,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Side::Human => Color::White,
            Side::Ai => Color::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => write!(f, "Human"),
            Side::Ai => write!(f, "AI"),
        }
    }
}

/// One applied move together with who played it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub side: Side,
    pub played: PlayedMove,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.side {
            Side::Human => 'H',
            Side::Ai => 'A',
        };
        write!(f, "{}-{}", tag, self.played)
    }
}

/// Ordered record of every applied move, oldest first.
///
/// Its length decides whose turn it is: even means the human moves next.
/// Entries are only ever appended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveHistory {
    entries: Vec<HistoryEntry>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn to_move(&self) -> Side {
        if self.entries.len() % 2 == 0 {
            Side::Human
        } else {
            Side::Ai
        }
    }

    /// Moves played by one side so far.
    pub fn count_for(&self, side: Side) -> usize {
        self.entries.iter().filter(|e| e.side == side).count()
    }

    pub(crate) fn push(&mut self, side: Side, played: PlayedMove) -> HistoryEntry {
        debug_assert_eq!(side, self.to_move(), "history pushed out of turn");
        let entry = HistoryEntry { side, played };
        self.entries.push(entry);
        entry
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
