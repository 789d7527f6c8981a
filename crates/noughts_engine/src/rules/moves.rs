//! Move validation, application and outcome detection.

use tracing::{debug, instrument, warn};

use super::Outcome;
use super::draw::is_draw;
use super::win::check_winner;
use crate::action::{Move, RuleViolation};
use crate::invariants::TransitionContract;
use crate::state::{GameState, GameStatus};
use crate::types::{Board, Mark, Position};

/// Validates a proposed move against the current game.
///
/// Checks run in a fixed order: bounds, game started, game over, cell
/// occupied, turn parity, then (if the move names one) the submitting
/// player's ownership of the mark.
///
/// # Errors
///
/// Returns the first [`RuleViolation`] that applies.
#[instrument(skip_all, fields(game_id = %state.id(), mv = %mv))]
pub fn validate_move(state: &GameState, mv: &Move) -> Result<Position, RuleViolation> {
    let pos = Position::from_row_col(mv.row, mv.col).ok_or(RuleViolation::OutOfBounds {
        row: mv.row,
        col: mv.col,
    })?;

    match state.status() {
        GameStatus::AwaitingSecondPlayer => return Err(RuleViolation::GameNotStarted),
        GameStatus::Won(_) | GameStatus::Drawn => return Err(RuleViolation::GameOver),
        GameStatus::InProgress => {}
    }

    if !state.board().is_empty(pos) {
        return Err(RuleViolation::CellOccupied(pos));
    }

    let expected = state.next_mark();
    if mv.mark != expected {
        return Err(RuleViolation::WrongTurn {
            expected,
            got: mv.mark,
        });
    }

    if let Some(player) = &mv.player {
        let owner = state.player_for(mv.mark).map(|p| p.id());
        if owner != Some(player) {
            return Err(RuleViolation::WrongPlayer {
                player: player.clone(),
                mark: mv.mark,
            });
        }
    }

    Ok(pos)
}

/// Places `mark` at `pos` and increments the move count.
///
/// Only call after [`validate_move`] returned `Ok(pos)`; status is left for
/// [`detect_outcome`] to decide.
#[instrument(skip(state), fields(game_id = %state.id()))]
pub fn apply_move(mut state: GameState, pos: Position, mark: Mark) -> GameState {
    state.place(pos, mark);
    state
}

/// Classifies a board as won, drawn or still open.
pub fn board_outcome(board: &Board) -> Outcome {
    if let Some(mark) = check_winner(board) {
        Outcome::Won(mark)
    } else if is_draw(board) {
        Outcome::Drawn
    } else {
        Outcome::Unchanged
    }
}

/// Checks all eight lines and the fill level of the game's board.
///
/// Pure: the same board always yields the same outcome.
#[instrument(skip(state), fields(game_id = %state.id()))]
pub fn detect_outcome(state: &GameState) -> Outcome {
    board_outcome(state.board())
}

/// Validates, applies and scores a move in one step.
///
/// The returned state has its status updated from [`detect_outcome`] and has
/// passed the [`TransitionContract`] postcondition.
///
/// # Errors
///
/// Returns the validation failure, or an invariant violation if the
/// transition would break a game invariant. `state` is consumed either way;
/// callers keep their own copy if they need the original.
#[instrument(skip_all, fields(game_id = %state.id(), mv = %mv))]
pub fn play(state: GameState, mv: &Move) -> Result<GameState, RuleViolation> {
    let pos = validate_move(&state, mv).inspect_err(|e| {
        warn!(error = %e, "Move rejected");
    })?;

    let mut next = apply_move(state.clone(), pos, mv.mark);
    match detect_outcome(&next) {
        Outcome::Won(mark) => next.set_status(GameStatus::Won(mark)),
        Outcome::Drawn => next.set_status(GameStatus::Drawn),
        Outcome::Unchanged => {}
    }

    TransitionContract::check(&state, &next)?;
    debug!(
        position = %pos,
        move_count = next.move_count(),
        status = next.status().label(),
        "Move applied"
    );
    Ok(next)
}
