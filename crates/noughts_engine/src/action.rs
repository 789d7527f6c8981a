//! Moves and the reasons a move or join can be rejected.
//!
//! A move is a proposed mutation. It carries client input verbatim and is
//! validated against a [`crate::GameState`] before anything is applied.

use serde::{Deserialize, Serialize};

use crate::invariants::InvariantViolation;
use crate::state::PlayerId;
use crate::types::{Mark, Position};

/// A proposed placement of a mark at a row and column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Row, expected in `0..=2`.
    pub row: i32,
    /// Column, expected in `0..=2`.
    pub col: i32,
    /// Mark being placed.
    pub mark: Mark,
    /// Submitting player, when the caller identifies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
}

impl Move {
    /// Creates an anonymous move.
    pub fn new(row: i32, col: i32, mark: Mark) -> Self {
        Self {
            row,
            col,
            mark,
            player: None,
        }
    }

    /// Attaches the submitting player.
    pub fn by(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ({}, {})", self.mark, self.row, self.col)
    }
}

/// A game rule rejected the requested operation.
///
/// Every variant is detected before any mutation is applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RuleViolation {
    /// Join attempted on a game that already has two players.
    #[display("Game already has two players")]
    GameFull,

    /// Move attempted before the second player joined.
    #[display("Game has not started; waiting for a second player")]
    GameNotStarted,

    /// Move attempted after the game was won or drawn.
    #[display("Game is already over")]
    GameOver,

    /// Row or column outside `0..=2`.
    #[display("Cell ({}, {}) is outside the 3x3 board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: i32,
        /// Requested column.
        col: i32,
    },

    /// Target cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// Move carries a mark other than the one whose turn it is.
    #[display("It is {}'s turn, not {}'s", expected, got)]
    WrongTurn {
        /// Mark whose turn it is.
        expected: Mark,
        /// Mark carried by the move.
        got: Mark,
    },

    /// Submitting player does not own the mark carried by the move.
    #[display("Player {} does not play {}", player, mark)]
    WrongPlayer {
        /// Submitting player.
        player: PlayerId,
        /// Mark carried by the move.
        mark: Mark,
    },

    /// Winner requested before the game was won.
    #[display("Game has no winner")]
    NoWinnerYet,

    /// A postcondition failed after a transition. Never persisted.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl RuleViolation {
    /// Stable snake_case name of the violation.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Collapses a list of invariant violations into a single error.
    pub(crate) fn from_violations(violations: Vec<InvariantViolation>) -> Self {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        RuleViolation::InvariantViolation(descriptions)
    }
}

impl std::error::Error for RuleViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(RuleViolation::GameFull.kind(), "game_full");
        assert_eq!(
            RuleViolation::OutOfBounds { row: 3, col: 0 }.kind(),
            "out_of_bounds"
        );
        assert_eq!(RuleViolation::NoWinnerYet.kind(), "no_winner_yet");
    }

    #[test]
    fn test_move_json_shape() {
        let mv: Move = serde_json::from_str(r#"{"row":1,"col":2,"mark":"cross"}"#).unwrap();
        assert_eq!(mv, Move::new(1, 2, Mark::Cross));
    }
}
