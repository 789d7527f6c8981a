//! Route handlers.
//!
//! Each handler parses its inputs, then runs the service call on the
//! blocking pool since the store may hold a lock or a SQLite transaction for
//! the duration of the call.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use noughts_engine::{GameId, Mark, Move, PlayerId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::AppState;
use super::error::ApiError;
use super::view::{GameView, MoveRequest, PlaceRequest, PlayerView, SeatRequest};
use crate::error::ServiceError;
use crate::service::GameService;

/// Runs a service operation on the blocking pool.
async fn run_blocking<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&GameService) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service().clone();
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn parse_game_id(raw: &str) -> Result<GameId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::InvalidGameId(raw.to_string()))
}

/// Parses a JSON body. An empty body yields the default value.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_body(body)
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

fn seat_player(req: SeatRequest) -> PlayerId {
    req.player_id
        .map(PlayerId::new)
        .unwrap_or_else(PlayerId::generate)
}

fn build_move(row: i32, col: i32, mark: Mark, player_id: Option<String>) -> Move {
    let mv = Move::new(row, col, mark);
    match player_id {
        Some(id) => mv.by(PlayerId::new(id)),
        None => mv,
    }
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /game`
#[instrument(skip_all)]
pub async fn create_game(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let player = seat_player(parse_optional_body(&body)?);
    debug!(player = %player, "Create requested");
    let game = run_blocking(&state, move |service| service.create_game(player)).await?;
    Ok((StatusCode::CREATED, Json(GameView::from(&game))))
}

/// `POST /game/{id}/join`
#[instrument(skip(state, body))]
pub async fn join_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GameView>, ApiError> {
    let id = parse_game_id(&id)?;
    let player = seat_player(parse_optional_body(&body)?);
    let game = run_blocking(&state, move |service| service.join_game(&id, player)).await?;
    Ok(Json(GameView::from(&game)))
}

/// `GET /game/{id}`
#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let id = parse_game_id(&id)?;
    let game = run_blocking(&state, move |service| service.get_game(&id)).await?;
    Ok(Json(GameView::from(&game)))
}

/// `GET /game/{id}/winner`
#[instrument(skip(state))]
pub async fn get_winner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerView>, ApiError> {
    let id = parse_game_id(&id)?;
    let winner = run_blocking(&state, move |service| service.get_winner(&id)).await?;
    Ok(Json(PlayerView::from(&winner)))
}

/// `POST /game/{id}/nought`
#[instrument(skip(state, body))]
pub async fn place_nought(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GameView>, ApiError> {
    place(state, &id, Mark::Nought, &body).await
}

/// `POST /game/{id}/cross`
#[instrument(skip(state, body))]
pub async fn place_cross(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GameView>, ApiError> {
    place(state, &id, Mark::Cross, &body).await
}

async fn place(
    state: AppState,
    id: &str,
    mark: Mark,
    body: &Bytes,
) -> Result<Json<GameView>, ApiError> {
    let id = parse_game_id(id)?;
    let req: PlaceRequest = parse_body(body)?;
    let mv = build_move(req.row, req.col, mark, req.player_id);
    let game = run_blocking(&state, move |service| service.submit_move(&id, mv)).await?;
    Ok(Json(GameView::from(&game)))
}

/// `POST /game/{id}/move`
#[instrument(skip(state, body))]
pub async fn submit_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GameView>, ApiError> {
    let id = parse_game_id(&id)?;
    let req: MoveRequest = parse_body(&body)?;
    let mv = build_move(req.row, req.col, req.mark, req.player_id);
    let game = run_blocking(&state, move |service| service.submit_move(&id, mv)).await?;
    Ok(Json(GameView::from(&game)))
}
