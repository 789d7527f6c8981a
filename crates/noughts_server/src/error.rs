//! Service-level error taxonomy.

use noughts_engine::{GameId, RuleViolation};

use crate::store::StoreError;

/// Error returned by [`GameService`](crate::GameService) operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ServiceError {
    /// No record exists for the identifier.
    #[display("Game {} not found", _0)]
    GameNotFound(GameId),

    /// A game rule rejected the operation; nothing was written.
    #[display("{}", _0)]
    Rule(RuleViolation),

    /// The store failed; the atomic unit did not commit.
    #[display("{}", _0)]
    Storage(StoreError),
}

impl ServiceError {
    /// Stable snake_case name of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::GameNotFound(_) => "game_not_found",
            ServiceError::Rule(violation) => violation.kind(),
            ServiceError::Storage(_) => "storage_failure",
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::GameNotFound(_) => None,
            ServiceError::Rule(violation) => Some(violation),
            ServiceError::Storage(err) => Some(err),
        }
    }
}

impl From<RuleViolation> for ServiceError {
    fn from(violation: RuleViolation) -> Self {
        ServiceError::Rule(violation)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Storage(err)
    }
}

// Lets diesel transactions roll back with a ServiceError.
impl From<diesel::result::Error> for ServiceError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        ServiceError::Storage(StoreError::from(err))
    }
}
