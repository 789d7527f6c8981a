//! Win detection.

use tracing::instrument;

use crate::types::{Board, Mark, Square};

/// The eight winning lines as row-major indices.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

fn line_owner(board: &Board, [a, b, c]: [usize; 3]) -> Option<Mark> {
    let sq = board.squares()[a];
    match sq {
        Square::Occupied(mark) if sq == board.squares()[b] && sq == board.squares()[c] => {
            Some(mark)
        }
        _ => None,
    }
}

/// Checks if there is a winner on the board.
///
/// Returns the mark owning the first completed line found, scanning rows,
/// then columns, then diagonals.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.into_iter().find_map(|line| line_owner(board, line))
}

/// Returns true if `mark` holds any complete line.
pub fn has_line(board: &Board, mark: Mark) -> bool {
    LINES
        .into_iter()
        .any(|line| line_owner(board, line) == Some(mark))
}
