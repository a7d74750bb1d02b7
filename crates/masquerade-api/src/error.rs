//! Masquerade — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use masquerade_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// Tracing subscriber or span exporter setup failed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "group_not_found"),
            DomainError::HintsNotFound(_) => (StatusCode::NOT_FOUND, "hints_not_found"),
            DomainError::Forbidden { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            DomainError::InsufficientPlayers { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_players")
            }
            DomainError::NoActiveSession(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no_active_session")
            }
            DomainError::AllPlayersRevealed => {
                (StatusCode::UNPROCESSABLE_ENTITY, "all_players_revealed")
            }
            DomainError::NoCurrentPlayer => (StatusCode::UNPROCESSABLE_ENTITY, "no_current_player"),
            DomainError::TurnAlreadyActive(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "turn_already_active")
            }
            DomainError::SideInactive(_) => (StatusCode::UNPROCESSABLE_ENTITY, "side_inactive"),
            DomainError::WrongMode { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "wrong_mode"),
            DomainError::InvalidHintIndex(_) => (StatusCode::BAD_REQUEST, "invalid_hint_index"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
