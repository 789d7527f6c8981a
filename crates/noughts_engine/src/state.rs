//! Game state: the persisted shape of a single game.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::action::RuleViolation;
use crate::invariants::{InvariantSet, StateInvariants};
use crate::types::{Board, Mark, Position, Square};

/// Unique identifier of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::str::FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Opaque player identifier.
///
/// Players are identified by value, never by reference. No authentication
/// is attached to an identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A seated player and the mark they were assigned when seated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier.
    id: PlayerId,
    /// Mark assigned at creation (first player) or join (second player).
    mark: Mark,
}

impl Player {
    /// Seats a player with the given mark.
    pub fn new(id: PlayerId, mark: Mark) -> Self {
        Self { id, mark }
    }
}

/// Lifecycle status of a game.
///
/// Transitions only move forward:
/// `AwaitingSecondPlayer -> InProgress -> {Won, Drawn}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created, waiting for an opponent to join.
    AwaitingSecondPlayer,
    /// Both players seated; moves are accepted.
    InProgress,
    /// A line was completed by the given mark.
    Won(Mark),
    /// The board filled with no completed line.
    Drawn,
}

impl GameStatus {
    /// Returns true for `Won` and `Drawn`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::Won(_) | GameStatus::Drawn)
    }

    /// Stable snake_case label, shared by the HTTP view and the SQLite row.
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::AwaitingSecondPlayer => "awaiting_second_player",
            GameStatus::InProgress => "in_progress",
            GameStatus::Won(_) => "won",
            GameStatus::Drawn => "drawn",
        }
    }

    /// Position in the lifecycle; never decreases across a transition.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            GameStatus::AwaitingSecondPlayer => 0,
            GameStatus::InProgress => 1,
            GameStatus::Won(_) | GameStatus::Drawn => 2,
        }
    }
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) id: GameId,
    pub(crate) first_player: Player,
    pub(crate) second_player: Option<Player>,
    pub(crate) board: Board,
    pub(crate) status: GameStatus,
    pub(crate) move_count: u8,
}

impl GameState {
    /// Creates a game awaiting its second player. The creator plays noughts.
    #[instrument(skip_all, fields(game_id = %id, first_player = %first_player))]
    pub fn new(id: GameId, first_player: PlayerId) -> Self {
        Self {
            id,
            first_player: Player::new(first_player, Mark::Nought),
            second_player: None,
            board: Board::new(),
            status: GameStatus::AwaitingSecondPlayer,
            move_count: 0,
        }
    }

    /// Rebuilds a game from persisted parts, rejecting inconsistent records.
    ///
    /// # Errors
    ///
    /// Returns [`RuleViolation::InvariantViolation`] if the parts do not
    /// describe a reachable game state.
    #[instrument(skip(board))]
    pub fn restore(
        id: GameId,
        first_player: PlayerId,
        second_player: Option<PlayerId>,
        board: Board,
        status: GameStatus,
        move_count: u8,
    ) -> Result<Self, RuleViolation> {
        let state = Self {
            id,
            first_player: Player::new(first_player, Mark::Nought),
            second_player: second_player.map(|p| Player::new(p, Mark::Cross)),
            board,
            status,
            move_count,
        };
        StateInvariants::check_all(&state).map_err(RuleViolation::from_violations)?;
        Ok(state)
    }

    /// Game identifier.
    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// Player who created the game (noughts).
    pub fn first_player(&self) -> &Player {
        &self.first_player
    }

    /// Player who joined the game (crosses), if any.
    pub fn second_player(&self) -> Option<&Player> {
        self.second_player.as_ref()
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Lifecycle status.
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Number of moves accepted so far.
    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    /// Mark whose turn it is, derived from move-count parity.
    ///
    /// Even counts belong to noughts. This is only meaningful while the game
    /// is in progress.
    pub fn next_mark(&self) -> Mark {
        if self.move_count % 2 == 0 {
            Mark::Nought
        } else {
            Mark::Cross
        }
    }

    /// Player owning the given mark, if seated.
    pub fn player_for(&self, mark: Mark) -> Option<&Player> {
        match mark {
            Mark::Nought => Some(&self.first_player),
            Mark::Cross => self.second_player.as_ref(),
        }
    }

    /// Winning player. Present if and only if the status is `Won`.
    pub fn winner(&self) -> Option<&Player> {
        match self.status {
            GameStatus::Won(mark) => self.player_for(mark),
            _ => None,
        }
    }

    pub(crate) fn seat_second_player(&mut self, id: PlayerId) {
        self.second_player = Some(Player::new(id, Mark::Cross));
    }

    pub(crate) fn place(&mut self, pos: Position, mark: Mark) {
        self.board.set(pos, Square::Occupied(mark));
        self.move_count += 1;
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(layout: &str) -> [Square; 9] {
        let mut squares = [Square::Empty; 9];
        for (i, c) in layout.chars().enumerate() {
            squares[i] = Mark::from_symbol(c).map_or(Square::Empty, Square::Occupied);
        }
        squares
    }

    #[test]
    fn test_new_game() {
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        assert_eq!(game.status(), &GameStatus::AwaitingSecondPlayer);
        assert_eq!(game.first_player().mark(), &Mark::Nought);
        assert!(game.second_player().is_none());
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.next_mark(), Mark::Nought);
        assert!(game.winner().is_none());
    }

    #[test]
    fn test_restore_consistent_record() {
        let board = Board::from_squares(squares("OOO.XX..."));
        let game = GameState::restore(
            GameId::generate(),
            PlayerId::new("p1"),
            Some(PlayerId::new("p2")),
            board,
            GameStatus::Won(Mark::Nought),
            5,
        )
        .unwrap();
        assert_eq!(game.winner().map(|p| p.id().as_str()), Some("p1"));
    }

    #[test]
    fn test_restore_rejects_move_count_mismatch() {
        let board = Board::from_squares(squares("O...X...."));
        let result = GameState::restore(
            GameId::generate(),
            PlayerId::new("p1"),
            Some(PlayerId::new("p2")),
            board,
            GameStatus::InProgress,
            3,
        );
        assert!(matches!(result, Err(RuleViolation::InvariantViolation(_))));
    }

    #[test]
    fn test_restore_rejects_won_without_line() {
        let board = Board::from_squares(squares("OO..X...."));
        let result = GameState::restore(
            GameId::generate(),
            PlayerId::new("p1"),
            Some(PlayerId::new("p2")),
            board,
            GameStatus::Won(Mark::Nought),
            3,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_game_id_parse() {
        let id = GameId::generate();
        let parsed: GameId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<GameId>().is_err());
    }
}
