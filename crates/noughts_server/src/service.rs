//! Game service: the five operations exposed to transports.
//!
//! Every mutating operation is a single [`GameStore::update`] call, so the
//! load, validate, mutate, detect and persist steps run as one atomic unit
//! per game. Nothing survives between calls except what the store holds.

use std::sync::Arc;

use noughts_engine::{GameId, GameState, Move, Player, PlayerId, RuleViolation, rules};
use tracing::{debug, info, instrument, warn};

use crate::error::ServiceError;
use crate::store::GameStore;

/// Orchestrates the rule engine over a [`GameStore`].
#[derive(Debug, Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
}

impl GameService {
    /// Creates a service backed by the given store.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        info!(?store, "Creating GameService");
        Self { store }
    }

    /// Creates a game with `player` seated as noughts.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] if the record cannot be written.
    #[instrument(skip(self))]
    pub fn create_game(&self, player: PlayerId) -> Result<GameState, ServiceError> {
        let state = GameState::new(GameId::generate(), player);
        let id = self.store.create(&state)?;
        info!(game_id = %id, "Game created");
        Ok(state)
    }

    /// Seats `player` as crosses and starts the game.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`], [`RuleViolation::GameFull`], or
    /// a storage failure.
    #[instrument(skip(self))]
    pub fn join_game(&self, id: &GameId, player: PlayerId) -> Result<GameState, ServiceError> {
        let state = self
            .store
            .update(id, Box::new(move |state| Ok(rules::join(state, player)?)))
            .inspect_err(|e| warn!(error = %e, "Join failed"))?;
        info!(game_id = %id, "Player joined");
        Ok(state)
    }

    /// Validates and applies `mv`, updating status and winner.
    ///
    /// A rejected move is never persisted.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`], the move's [`RuleViolation`],
    /// or a storage failure.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn submit_move(&self, id: &GameId, mv: Move) -> Result<GameState, ServiceError> {
        let state = self
            .store
            .update(id, Box::new(move |state| Ok(rules::play(state, &mv)?)))
            .inspect_err(|e| warn!(error = %e, "Move failed"))?;
        info!(
            game_id = %id,
            move_count = state.move_count(),
            status = state.status().label(),
            "Move committed"
        );
        Ok(state)
    }

    /// Loads a game without locking it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`] or a storage failure.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: &GameId) -> Result<GameState, ServiceError> {
        let state = self.store.read(id)?;
        debug!(status = state.status().label(), "Game loaded");
        Ok(state)
    }

    /// Returns the winning player.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::GameNotFound`], [`RuleViolation::NoWinnerYet`]
    /// unless the game is won (a drawn game has no winner), or a storage
    /// failure.
    #[instrument(skip(self))]
    pub fn get_winner(&self, id: &GameId) -> Result<Player, ServiceError> {
        let state = self.store.read(id)?;
        state
            .winner()
            .cloned()
            .ok_or(ServiceError::Rule(RuleViolation::NoWinnerYet))
    }
}
