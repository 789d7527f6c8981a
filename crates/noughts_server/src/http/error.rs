//! HTTP error mapping.
//!
//! [`ApiError`] wraps every failure a handler can see and turns it into a
//! JSON response via its [`IntoResponse`] implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use noughts_engine::RuleViolation;
use tracing::error;

use crate::error::ServiceError;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// The service rejected or failed the operation.
    #[display("{}", _0)]
    Service(ServiceError),

    /// The path did not contain a valid game identifier.
    #[display("Invalid game id: {}", _0)]
    InvalidGameId(String),

    /// The request body was not valid JSON for the route.
    #[display("Invalid request body: {}", _0)]
    InvalidBody(String),

    /// The blocking task running the operation did not complete.
    #[display("Internal error: {}", _0)]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Service(ServiceError::GameNotFound(_)) | Self::InvalidGameId(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Service(ServiceError::Rule(RuleViolation::InvariantViolation(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Service(ServiceError::Rule(_)) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Service(ServiceError::Storage(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable snake_case name of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service(err) => err.kind(),
            Self::InvalidGameId(_) => "game_not_found",
            Self::InvalidBody(_) => "invalid_body",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "Request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
