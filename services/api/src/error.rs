//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and its
//! mapping onto the JSON error envelope every route responds with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;
use eduvisual_core::ports::PortError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request input. Never retried, always a 400.
    #[error("{0}")]
    Validation(String),

    /// A source document that could not be read (e.g. an unparsable PDF).
    #[error("{0}")]
    Parsing(String),

    /// An unknown lecture id or other missing resource.
    #[error("{0}")]
    NotFound(String),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A failed export render.
    #[error("Export failed: {0}")]
    Export(String),

    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Parsing(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Port(_) | ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message exposed to the caller. Internal failures are logged with
    /// their cause but reported generically.
    fn public_message(&self) -> String {
        match self {
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {:?}", self);
        }
        let body = Json(json!({
            "success": false,
            "error": self.public_message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            ApiError::Validation("Content is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unknown_id_maps_to_404() {
        assert_eq!(
            ApiError::NotFound("no such lecture".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let err = ApiError::Internal("db password wrong".into());
        assert_eq!(err.public_message(), "Internal server error");
    }
}
