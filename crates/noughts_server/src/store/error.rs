//! Storage failures.

use derive_more::Display;
use noughts_engine::GameId;
use tracing::{error, instrument};

/// Why a store operation could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StoreError {
    /// `create` was given an identifier that already has a record.
    #[display("Game {} already exists", _0)]
    Duplicate(GameId),

    /// A stored record could not be decoded into a valid game.
    #[display("Corrupt game record {}: {}", id, reason)]
    Corrupt {
        /// Record key as stored.
        id: String,
        /// What failed to decode or validate.
        reason: String,
    },

    /// The backend itself failed (connection, query, migration).
    #[display("Storage backend error: {} at {}:{}", message, file, line)]
    Backend {
        /// Backend message.
        message: String,
        /// Line where the failure was raised.
        line: u32,
        /// Source file where the failure was raised.
        file: &'static str,
    },
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Backend failure tagged with the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn backend(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(%message, file = loc.file(), line = loc.line(), "Storage backend failure");
        Self::Backend {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Record `id` failed to decode.
    pub fn corrupt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::backend(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::backend(format!("Connection error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_records_caller() {
        let err = StoreError::backend("disk full");
        match err {
            StoreError::Backend { message, file, .. } => {
                assert_eq!(message, "disk full");
                assert!(file.ends_with("error.rs"));
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_diesel_not_found_is_backend() {
        let err = StoreError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, StoreError::Backend { .. }));
    }
}
