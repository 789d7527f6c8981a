//! Draw detection.

use tracing::instrument;

use super::win::check_winner;
use crate::types::{Board, Square};

/// Checks if every square is occupied.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A full board with no completed line.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && check_winner(board).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mark, Position};

    fn fill(board: &mut Board, layout: &str) {
        for (i, c) in layout.chars().enumerate() {
            if let Some(mark) = Mark::from_symbol(c) {
                board.set(Position::ALL[i], Square::Occupied(mark));
            }
        }
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        fill(&mut board, "....O....");
        assert!(!is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_draw_detection() {
        // O X O / O X X / X O O
        let mut board = Board::new();
        fill(&mut board, "OXOOXXXOO");
        assert!(is_full(&board));
        assert!(is_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        let mut board = Board::new();
        fill(&mut board, "OOOXXOXOX");
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
