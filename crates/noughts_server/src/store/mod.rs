//! Transactional game persistence.
//!
//! A [`GameStore`] owns game records keyed by [`GameId`] and guarantees that
//! [`GameStore::update`] runs as an exclusive read-modify-write for one key.
//! Updates against different keys never share a lock.

mod error;
mod locks;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::StoreError;
pub(crate) use locks::KeyedLocks;
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, run_migrations};

use noughts_engine::{GameId, GameState};

use crate::error::ServiceError;

/// Read-modify-write step run by [`GameStore::update`].
///
/// Receives the stored state by value and returns the state to commit. An
/// `Err` aborts the update and nothing is written.
pub type Mutation<'a> = Box<dyn FnOnce(GameState) -> Result<GameState, ServiceError> + 'a>;

/// Persistence contract required by the game service.
pub trait GameStore: Send + Sync + std::fmt::Debug {
    /// Persists a new record and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a record with the same identifier exists or
    /// the backend fails.
    fn create(&self, state: &GameState) -> Result<GameId, StoreError>;

    /// Loads a record without taking the per-game lock.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`] for unknown identifiers and
    /// [`ServiceError::Storage`] on backend failure.
    fn read(&self, id: &GameId) -> Result<GameState, ServiceError>;

    /// Atomically loads a record, applies `mutation`, persists and returns
    /// the result. Exclusive per identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`] for unknown identifiers, the
    /// mutation's own error (with nothing written), or a storage failure
    /// (with nothing committed).
    fn update(&self, id: &GameId, mutation: Mutation<'_>) -> Result<GameState, ServiceError>;
}
