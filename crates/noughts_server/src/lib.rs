//! Noughts server library - transactional game store and REST API
//!
//! Hosts noughts-and-crosses games on top of [`noughts_engine`].
//!
//! # Architecture
//!
//! - **Store**: [`GameStore`] with in-memory and SQLite backends, exclusive per game
//! - **Service**: [`GameService`] running each operation as one atomic store update
//! - **HTTP**: axum router mapping service errors to status codes
//! - **Config**: TOML file plus CLI overrides
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use noughts_engine::{Mark, Move, PlayerId};
//! use noughts_server::{GameService, MemoryStore};
//!
//! # fn example() -> Result<(), noughts_server::ServiceError> {
//! let service = GameService::new(Arc::new(MemoryStore::new()));
//! let game = service.create_game(PlayerId::new("p1"))?;
//! service.join_game(game.id(), PlayerId::new("p2"))?;
//! let game = service.submit_move(game.id(), Move::new(1, 1, Mark::Nought))?;
//! assert_eq!(game.move_count(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod error;
mod http;
mod server;
mod service;
mod store;

// Crate-level exports - CLI
pub use cli::{Cli, Command, ServeOverrides};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig, StorageKind};

// Crate-level exports - Errors
pub use error::ServiceError;

// Crate-level exports - HTTP transport
pub use http::{
    ApiError, AppState, GameView, MoveRequest, PlaceRequest, PlayerView, SeatRequest, build_router,
};

// Crate-level exports - Server assembly
pub use server::{build_store, serve};

// Crate-level exports - Service
pub use service::GameService;

// Crate-level exports - Storage
pub use store::{GameStore, MemoryStore, Mutation, SqliteStore, StoreError, run_migrations};
