//! In-memory game store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use noughts_engine::{GameId, GameState};
use tracing::{debug, info, instrument};

use super::{GameStore, Mutation, StoreError};
use crate::error::ServiceError;

/// Game store backed by a map of per-game mutexes.
///
/// The outer map lock is held only to look up or insert an entry. Each
/// update then holds that game's own mutex while it reads, mutates and
/// writes back. Mutations work on a clone, so a failed or panicking
/// mutation leaves the stored record untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<GameId, Arc<Mutex<GameState>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    fn entry(&self, id: &GameId) -> Option<Arc<Mutex<GameState>>> {
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self, state), fields(game_id = %state.id()))]
    fn create(&self, state: &GameState) -> Result<GameId, StoreError> {
        let mut games = self.games.lock().unwrap_or_else(PoisonError::into_inner);
        if games.contains_key(state.id()) {
            return Err(StoreError::Duplicate(*state.id()));
        }
        games.insert(*state.id(), Arc::new(Mutex::new(state.clone())));
        debug!(count = games.len(), "Game stored");
        Ok(*state.id())
    }

    #[instrument(skip(self))]
    fn read(&self, id: &GameId) -> Result<GameState, ServiceError> {
        let entry = self.entry(id).ok_or(ServiceError::GameNotFound(*id))?;
        let state = entry.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(state)
    }

    #[instrument(skip(self, mutation))]
    fn update(&self, id: &GameId, mutation: Mutation<'_>) -> Result<GameState, ServiceError> {
        let entry = self.entry(id).ok_or(ServiceError::GameNotFound(*id))?;
        let mut stored = entry.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Game lock acquired");

        let next = mutation(stored.clone())?;
        *stored = next.clone();
        Ok(next)
    }
}
