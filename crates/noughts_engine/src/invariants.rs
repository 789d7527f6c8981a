//! First-class invariants for noughts and crosses.
//!
//! Invariants are logical properties that must hold for every stored game.
//! State invariants judge a single snapshot; the transition contract judges
//! a before/after pair. Both run after every rule-engine transition and
//! when a persisted record is restored.

use tracing::{instrument, warn};

use crate::action::RuleViolation;
use crate::rules::win::has_line;
use crate::state::{GameState, GameStatus};
use crate::types::{Mark, Position, Square};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: move count equals the number of occupied cells and never exceeds 9.
pub struct MoveCountConsistent;

impl Invariant<GameState> for MoveCountConsistent {
    fn holds(game: &GameState) -> bool {
        let count = game.move_count() as usize;
        count <= 9 && count == game.board().occupied()
    }

    fn description() -> &'static str {
        "Move count matches occupied cells and is at most 9"
    }
}

/// Invariant: marks alternate, so noughts lead crosses by zero or one.
pub struct MarksAlternate;

impl Invariant<GameState> for MarksAlternate {
    fn holds(game: &GameState) -> bool {
        let noughts = game.board().count(Mark::Nought);
        let crosses = game.board().count(Mark::Cross);
        noughts == crosses || noughts == crosses + 1
    }

    fn description() -> &'static str {
        "Noughts and crosses alternate starting with noughts"
    }
}

/// Invariant: status agrees with the seated players and the board.
///
/// - `AwaitingSecondPlayer`: no second player, empty board
/// - `InProgress`: second player seated, no completed line, board not full
/// - `Won(mark)`: second player seated, `mark` completed a line and moved last
/// - `Drawn`: second player seated, board full, no completed line
pub struct StatusMatchesBoard;

impl Invariant<GameState> for StatusMatchesBoard {
    fn holds(game: &GameState) -> bool {
        let board = game.board();
        let seated = game.second_player().is_some();
        let any_line = has_line(board, Mark::Nought) || has_line(board, Mark::Cross);
        let full = board.occupied() == 9;

        match game.status() {
            GameStatus::AwaitingSecondPlayer => !seated && board.occupied() == 0,
            GameStatus::InProgress => seated && !any_line && !full,
            GameStatus::Won(mark) => {
                let last_mover = game.next_mark().opponent();
                seated
                    && game.move_count() > 0
                    && last_mover == *mark
                    && has_line(board, *mark)
                    && !has_line(board, mark.opponent())
            }
            GameStatus::Drawn => seated && full && !any_line,
        }
    }

    fn description() -> &'static str {
        "Status agrees with players and board"
    }
}

/// All single-state invariants as a composable set.
pub type StateInvariants = (MoveCountConsistent, MarksAlternate, StatusMatchesBoard);

/// Postcondition over a transition from `before` to `after`.
///
/// - identity and first player never change
/// - a seated second player never changes
/// - occupied cells are never overwritten or cleared
/// - at most one move is added per transition
/// - status only moves forward one step, and terminal states are final
pub struct TransitionContract;

impl TransitionContract {
    /// Checks the transition and all state invariants of `after`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InvariantViolation`] describing every
    /// property that failed.
    #[instrument(skip_all, fields(game_id = %before.id()))]
    pub fn check(before: &GameState, after: &GameState) -> Result<(), RuleViolation> {
        let mut violations = Vec::new();

        if before.id() != after.id() || before.first_player() != after.first_player() {
            violations.push(InvariantViolation::new("Game identity is immutable"));
        }

        if let Some(seated) = before.second_player()
            && after.second_player() != Some(seated)
        {
            violations.push(InvariantViolation::new("Second player is set at most once"));
        }

        let overwritten = Position::ALL.iter().any(|&pos| {
            let old = before.board().get(pos);
            old != Square::Empty && after.board().get(pos) != old
        });
        if overwritten {
            violations.push(InvariantViolation::new(
                "Occupied cells are never overwritten or cleared",
            ));
        }

        let added = after.move_count() as i16 - before.move_count() as i16;
        if !(0..=1).contains(&added) {
            violations.push(InvariantViolation::new("At most one move per transition"));
        }

        let before_rank = before.status().rank();
        let after_rank = after.status().rank();
        let regressed = after_rank < before_rank || after_rank > before_rank + 1;
        let terminal_changed = before.status().is_terminal() && before != after;
        if regressed || terminal_changed {
            violations.push(InvariantViolation::new("Status transitions are monotonic"));
        }

        if let Err(state_violations) = StateInvariants::check_all(after) {
            violations.extend(state_violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            warn!(count = violations.len(), "Transition postcondition failed");
            Err(RuleViolation::from_violations(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Move;
    use crate::rules;
    use crate::state::{GameId, PlayerId};

    fn started() -> GameState {
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        rules::join(game, PlayerId::new("p2")).unwrap()
    }

    #[test]
    fn test_state_invariants_hold_for_new_game() {
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        assert!(StateInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_contract_holds_after_move() {
        let before = started();
        let after = rules::play(before.clone(), &Move::new(1, 1, Mark::Nought)).unwrap();
        assert!(TransitionContract::check(&before, &after).is_ok());
    }

    #[test]
    fn test_contract_detects_overwrite() {
        let before = rules::play(started(), &Move::new(1, 1, Mark::Nought)).unwrap();
        let mut after = before.clone();
        after.board = crate::Board::from_squares({
            let mut squares = *before.board().squares();
            squares[4] = Square::Occupied(Mark::Cross);
            squares
        });
        let result = TransitionContract::check(&before, &after);
        assert!(matches!(result, Err(RuleViolation::InvariantViolation(_))));
    }

    #[test]
    fn test_contract_detects_skipped_status() {
        let before = GameState::new(GameId::generate(), PlayerId::new("p1"));
        let mut after = before.clone();
        after.set_status(GameStatus::Drawn);
        assert!(TransitionContract::check(&before, &after).is_err());
    }

    #[test]
    fn test_contract_detects_double_move() {
        let before = started();
        let mut after = before.clone();
        after.place(Position::ALL[0], Mark::Nought);
        after.place(Position::ALL[1], Mark::Cross);
        assert!(TransitionContract::check(&before, &after).is_err());
    }
}
