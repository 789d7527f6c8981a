//! Database rows and their conversion to and from [`GameState`].

use chrono::NaiveDateTime;
use derive_getters::Getters;
use diesel::prelude::*;
use noughts_engine::{Board, GameId, GameState, GameStatus, Mark, PlayerId, Square};
use tracing::instrument;

use super::{StoreError, schema};

/// Empty cell in the stored board string.
const EMPTY_CELL: char = '.';

/// Stored game record.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    id: String,
    first_player_id: String,
    second_player_id: Option<String>,
    board: String,
    status: String,
    winner_mark: Option<String>,
    move_count: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Decodes the row, rejecting records that fail the game invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any column is malformed or the decoded
    /// game is not a reachable state.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn into_state(self) -> Result<GameState, StoreError> {
        let corrupt = |reason: String| StoreError::corrupt(self.id.as_str(), reason);
        let id: GameId = self
            .id
            .parse()
            .map_err(|e| corrupt(format!("invalid game id: {}", e)))?;
        let board = decode_board(&self.board).map_err(corrupt)?;
        let status = decode_status(&self.status, self.winner_mark.as_deref()).map_err(corrupt)?;
        let move_count = u8::try_from(self.move_count)
            .map_err(|_| corrupt(format!("invalid move count {}", self.move_count)))?;

        GameState::restore(
            id,
            PlayerId::new(self.first_player_id),
            self.second_player_id.map(PlayerId::new),
            board,
            status,
            move_count,
        )
        .map_err(|e| StoreError::corrupt(id.to_string(), e.to_string()))
    }
}

/// Insertable game record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    id: String,
    first_player_id: String,
    second_player_id: Option<String>,
    board: String,
    status: String,
    winner_mark: Option<String>,
    move_count: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewGameRow {
    /// Encodes a freshly created game.
    pub fn from_state(state: &GameState, now: NaiveDateTime) -> Self {
        Self {
            id: state.id().to_string(),
            first_player_id: state.first_player().id().to_string(),
            second_player_id: state.second_player().map(|p| p.id().to_string()),
            board: encode_board(state.board()),
            status: state.status().label().to_string(),
            winner_mark: winner_mark(state.status()),
            move_count: i32::from(state.move_count()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Columns rewritten by an update. Identity and creation time never change.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct GameChangeset {
    second_player_id: Option<String>,
    board: String,
    status: String,
    winner_mark: Option<String>,
    move_count: i32,
    updated_at: NaiveDateTime,
}

impl GameChangeset {
    /// Encodes the mutable columns of `state`.
    pub fn from_state(state: &GameState, now: NaiveDateTime) -> Self {
        Self {
            second_player_id: state.second_player().map(|p| p.id().to_string()),
            board: encode_board(state.board()),
            status: state.status().label().to_string(),
            winner_mark: winner_mark(state.status()),
            move_count: i32::from(state.move_count()),
            updated_at: now,
        }
    }
}

fn winner_mark(status: &GameStatus) -> Option<String> {
    match status {
        GameStatus::Won(mark) => Some(mark.to_string()),
        _ => None,
    }
}

/// Encodes a board as nine characters: `O`, `X` or `.`.
pub fn encode_board(board: &Board) -> String {
    board
        .squares()
        .iter()
        .map(|s| s.mark().map_or(EMPTY_CELL, Mark::symbol))
        .collect()
}

/// Decodes a board produced by [`encode_board`].
///
/// # Errors
///
/// Returns the reason unless the input is exactly nine valid cells.
pub fn decode_board(encoded: &str) -> Result<Board, String> {
    let cells: Vec<char> = encoded.chars().collect();
    if cells.len() != 9 {
        return Err(format!("board must have 9 cells, got {}", cells.len()));
    }

    let mut squares = [Square::Empty; 9];
    for (square, &c) in squares.iter_mut().zip(&cells) {
        *square = match c {
            EMPTY_CELL => Square::Empty,
            other => Square::Occupied(
                Mark::from_symbol(other)
                    .ok_or_else(|| format!("invalid board cell '{}'", other))?,
            ),
        };
    }
    Ok(Board::from_squares(squares))
}

/// Decodes the status and winner columns.
///
/// # Errors
///
/// Returns the reason for unknown labels, or a winner column that
/// disagrees with the status.
pub fn decode_status(status: &str, winner: Option<&str>) -> Result<GameStatus, String> {
    let decoded = match (status, winner) {
        ("awaiting_second_player", None) => GameStatus::AwaitingSecondPlayer,
        ("in_progress", None) => GameStatus::InProgress,
        ("drawn", None) => GameStatus::Drawn,
        ("won", Some(mark)) => GameStatus::Won(
            mark.parse()
                .map_err(|_| format!("invalid winner mark '{}'", mark))?,
        ),
        _ => {
            return Err(format!(
                "invalid status '{}' with winner {:?}",
                status, winner
            ));
        }
    };
    Ok(decoded)
}
