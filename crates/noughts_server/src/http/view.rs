//! JSON views of engine types and request bodies.

use noughts_engine::{GameState, Mark, Player};
use serde::{Deserialize, Serialize};

/// A seated player as rendered over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Player identifier.
    pub id: String,
    /// Assigned mark.
    pub mark: Mark,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id().to_string(),
            mark: *player.mark(),
        }
    }
}

/// A game as rendered over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game identifier.
    pub id: String,
    /// Creator, playing noughts.
    pub first_player: PlayerView,
    /// Joiner, playing crosses.
    pub second_player: Option<PlayerView>,
    /// Rows of cells, `null` when empty.
    pub board: [[Option<Mark>; 3]; 3],
    /// Status label.
    pub status: String,
    /// Winning player, only for a won game.
    pub winner: Option<PlayerView>,
    /// Number of marks on the board.
    pub move_count: u8,
    /// Mark expected next, only while in progress.
    pub next_mark: Option<Mark>,
}

impl From<&GameState> for GameView {
    fn from(state: &GameState) -> Self {
        let in_progress = matches!(state.status(), noughts_engine::GameStatus::InProgress);
        Self {
            id: state.id().to_string(),
            first_player: state.first_player().into(),
            second_player: state.second_player().map(PlayerView::from),
            board: state.board().rows(),
            status: state.status().label().to_string(),
            winner: state.winner().map(PlayerView::from),
            move_count: state.move_count(),
            next_mark: in_progress.then(|| state.next_mark()),
        }
    }
}

/// Body for creating or joining a game. An absent id is generated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatRequest {
    /// Requested player identifier.
    #[serde(default)]
    pub player_id: Option<String>,
}

/// Body for a move whose mark comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRequest {
    /// Row, expected in `0..=2`.
    pub row: i32,
    /// Column, expected in `0..=2`.
    pub col: i32,
    /// Submitting player, checked against the mark's owner when present.
    #[serde(default)]
    pub player_id: Option<String>,
}

/// Body for a move carrying its own mark.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    /// Row, expected in `0..=2`.
    pub row: i32,
    /// Column, expected in `0..=2`.
    pub col: i32,
    /// Mark being placed.
    pub mark: Mark,
    /// Submitting player, checked against the mark's owner when present.
    #[serde(default)]
    pub player_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_engine::{GameId, PlayerId, rules};

    #[test]
    fn test_awaiting_view_shape() {
        let state = GameState::new(GameId::generate(), PlayerId::new("alice"));
        let json = serde_json::to_value(GameView::from(&state)).unwrap();

        assert_eq!(json["status"], "awaiting_second_player");
        assert_eq!(json["first_player"]["id"], "alice");
        assert_eq!(json["first_player"]["mark"], "nought");
        assert!(json["second_player"].is_null());
        assert!(json["winner"].is_null());
        assert!(json["next_mark"].is_null());
        assert_eq!(json["board"][1][1], serde_json::Value::Null);
        assert_eq!(json["move_count"], 0);
    }

    #[test]
    fn test_in_progress_view_shows_next_mark() {
        let state = GameState::new(GameId::generate(), PlayerId::new("alice"));
        let state = rules::join(state, PlayerId::new("bob")).unwrap();
        let view = GameView::from(&state);
        assert_eq!(view.next_mark, Some(Mark::Nought));
        assert_eq!(view.second_player.map(|p| p.mark), Some(Mark::Cross));
    }

    #[test]
    fn test_seat_request_accepts_empty_object() {
        let req: SeatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.player_id.is_none());
    }
}
