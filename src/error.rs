//! Error types for the tools API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),
}

/// Message returned for a create request that fails the field gate.
pub const MISSING_FIELDS_MESSAGE: &str = "Send all required fields";

/// Message returned when an id does not match any tool.
pub const NOT_FOUND_MESSAGE: &str = "Tool not found";

/// Errors surfaced by the HTTP handlers.
///
/// 4xx bodies carry `{"message": ...}`; the 500 body is `{"error": ...}` and
/// never includes the underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Send all required fields")]
    Validation,

    #[error("{0}")]
    BadRequest(String),

    #[error("Tool not found")]
    NotFound,

    #[error("Store fault: {0}")]
    Store(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": MISSING_FIELDS_MESSAGE })),
            )
                .into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": NOT_FOUND_MESSAGE })),
            )
                .into_response(),
            ApiError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = ApiError::Validation.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_fault_maps_to_500() {
        let resp = ApiError::Store(DatabaseError::Query("boom".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn store_fault_display_keeps_cause_for_logs() {
        let err = ApiError::from(DatabaseError::InvalidId("nope".into()));
        assert_eq!(err.to_string(), "Store fault: Invalid id: nope");
    }
}
