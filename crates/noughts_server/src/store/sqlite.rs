//! SQLite game store.

use std::sync::PoisonError;

use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use noughts_engine::{GameId, GameState};
use tracing::{debug, info, instrument};

use super::models::{GameChangeset, GameRow, NewGameRow};
use super::{GameStore, KeyedLocks, Mutation, StoreError, schema};
use crate::error::ServiceError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on SQLite's file lock before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Applies pending schema migrations to the database at `db_path`.
///
/// Returns the number of migrations applied.
///
/// # Errors
///
/// Returns [`StoreError`] if the database cannot be opened or a migration fails.
#[instrument]
pub fn run_migrations(db_path: &str) -> Result<usize, StoreError> {
    let mut conn = SqliteConnection::establish(db_path)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::backend(format!("Migration failed: {}", e)))?;
    info!(count = applied.len(), "Migrations applied");
    Ok(applied.len())
}

/// Game store backed by a SQLite file.
///
/// A fresh connection is opened per operation. Updates for the same game are
/// serialized by an in-process per-game lock table and each one runs inside
/// an `IMMEDIATE` transaction, so a failure at any step rolls back the whole
/// read-modify-write.
///
/// Requires a file path; `":memory:"` would give every connection its own
/// empty database.
#[derive(Debug)]
pub struct SqliteStore {
    db_path: String,
    locks: KeyedLocks,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating it and applying migrations
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_string();
        run_migrations(&db_path)?;

        let mut conn = SqliteConnection::establish(&db_path)?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;

        info!(path = %db_path, "SQLite game store ready");
        Ok(Self {
            db_path,
            locks: KeyedLocks::new(),
        })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::backend(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }
}

impl GameStore for SqliteStore {
    #[instrument(skip(self, state), fields(game_id = %state.id()))]
    fn create(&self, state: &GameState) -> Result<GameId, StoreError> {
        let mut conn = self.connection()?;
        let row = NewGameRow::from_state(state, Utc::now().naive_utc());

        diesel::insert_into(schema::games::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::Duplicate(*state.id())
                }
                other => StoreError::from(other),
            })?;

        info!("Game record inserted");
        Ok(*state.id())
    }

    #[instrument(skip(self))]
    fn read(&self, id: &GameId) -> Result<GameState, ServiceError> {
        let mut conn = self.connection()?;

        let row = schema::games::table
            .find(id.to_string())
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(ServiceError::GameNotFound(*id))?;

        debug!(updated_at = %row.updated_at(), "Game record loaded");
        Ok(row.into_state()?)
    }

    #[instrument(skip(self, mutation))]
    fn update(&self, id: &GameId, mutation: Mutation<'_>) -> Result<GameState, ServiceError> {
        let mut conn = self.connection()?;

        // Records are never deleted, so a slot is only ever made for a real game.
        let exists: bool = diesel::select(diesel::dsl::exists(
            schema::games::table.find(id.to_string()),
        ))
        .get_result(&mut conn)?;
        if !exists {
            return Err(ServiceError::GameNotFound(*id));
        }

        let slot = self.locks.slot(id);
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("Game lock acquired");

        conn.immediate_transaction(|conn| {
            let row = schema::games::table
                .find(id.to_string())
                .select(GameRow::as_select())
                .first(conn)
                .optional()?
                .ok_or(ServiceError::GameNotFound(*id))?;

            let next = mutation(row.into_state()?)?;

            let changes = GameChangeset::from_state(&next, Utc::now().naive_utc());
            diesel::update(schema::games::table.find(id.to_string()))
                .set(&changes)
                .execute(conn)?;

            debug!(move_count = next.move_count(), "Game record updated");
            Ok(next)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_engine::PlayerId;

    fn open() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("games.db").to_string_lossy()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_unknown_games_do_not_grow_lock_table() {
        let (_dir, store) = open();
        for _ in 0..100 {
            let id = GameId::generate();
            let result = store.update(&id, Box::new(|state| Ok(state)));
            assert_eq!(result, Err(ServiceError::GameNotFound(id)));
        }
        assert_eq!(store.locks.len(), 0);
    }

    #[test]
    fn test_lock_slot_is_made_per_existing_game() {
        let (_dir, store) = open();
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        let id = store.create(&game).unwrap();
        store.update(&id, Box::new(|state| Ok(state))).unwrap();
        store.update(&id, Box::new(|state| Ok(state))).unwrap();
        assert_eq!(store.locks.len(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_typed() {
        let (_dir, store) = open();
        let game = GameState::new(GameId::generate(), PlayerId::new("p1"));
        store.create(&game).unwrap();
        assert_eq!(store.create(&game), Err(StoreError::Duplicate(*game.id())));
    }
}
