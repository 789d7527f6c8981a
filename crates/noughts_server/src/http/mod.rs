//! REST transport over [`GameService`].

mod error;
mod handlers;
mod view;

pub use error::ApiError;
pub use view::{GameView, MoveRequest, PlaceRequest, PlayerView, SeatRequest};

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::service::GameService;

/// Shared handler state. Holds nothing but the service, so every request
/// sees game state only through the store.
#[derive(Debug, Clone, derive_new::new, derive_getters::Getters)]
pub struct AppState {
    service: GameService,
}

/// Builds the router.
///
/// - `GET /health`
/// - `POST /game`
/// - `GET /game/{id}`
/// - `POST /game/{id}/join`
/// - `GET /game/{id}/winner`
/// - `POST /game/{id}/nought`
/// - `POST /game/{id}/cross`
/// - `POST /game/{id}/move`
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/game", post(handlers::create_game))
        .route("/game/{id}", get(handlers::get_game))
        .route("/game/{id}/join", post(handlers::join_game))
        .route("/game/{id}/winner", get(handlers::get_winner))
        .route("/game/{id}/nought", post(handlers::place_nought))
        .route("/game/{id}/cross", post(handlers::place_cross))
        .route("/game/{id}/move", post(handlers::submit_move))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
