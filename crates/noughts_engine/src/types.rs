//! Core domain types for noughts and crosses.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark placed on the board.
///
/// The player who creates a game always plays noughts and moves first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mark {
    /// Nought, owned by the first player.
    Nought,
    /// Cross, owned by the second player.
    Cross,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Nought => Mark::Cross,
            Mark::Cross => Mark::Nought,
        }
    }

    /// Single-character symbol used when rendering boards.
    pub fn symbol(self) -> char {
        match self {
            Mark::Nought => 'O',
            Mark::Cross => 'X',
        }
    }

    /// Parses a symbol produced by [`Mark::symbol`].
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'O' => Some(Mark::Nought),
            'X' => Some(Mark::Cross),
            _ => None,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// A validated position on the 3x3 board, stored as a row-major index (0-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u8);

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position(0),
        Position(1),
        Position(2),
        Position(3),
        Position(4),
        Position(5),
        Position(6),
        Position(7),
        Position(8),
    ];

    /// Creates a position from a row and column, each in `0..=2`.
    ///
    /// Takes signed coordinates so that negative client input is reported
    /// as out of bounds rather than failing to parse.
    #[instrument]
    pub fn from_row_col(row: i32, col: i32) -> Option<Self> {
        if (0..3).contains(&row) && (0..3).contains(&col) {
            Some(Position((row * 3 + col) as u8))
        } else {
            None
        }
    }


    /// Row-major board index (0-8).
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// 3x3 board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from squares in row-major order.
    ///
    /// Used when restoring persisted games and in tests. Arbitrary square
    /// layouts are accepted here; [`crate::GameState::restore`] is what
    /// checks them against a game's status and move count.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.index()]
    }

    /// Places a mark at the given position.
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Number of squares holding the given mark.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(mark))
            .count()
    }

    /// Rows of marks, top to bottom. Empty squares are `None`.
    pub fn rows(&self) -> [[Option<Mark>; 3]; 3] {
        let mut rows = [[None; 3]; 3];
        for pos in Position::ALL {
            rows[pos.row() as usize][pos.col() as usize] = self.get(pos).mark();
        }
        rows
    }

}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
