//! Relay error types

use crate::protocol::CloseCode;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use mirror_common::ErrorResponse;
use mirror_core::RegistryError;
use thiserror::Error;

/// Errors surfaced while dispatching a request or pairing a connection
#[derive(Debug, Error)]
pub enum RelayError {
    /// Pairing attempted against an id the registry does not know
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A required query parameter was absent or empty
    #[error("Missing session ID")]
    MissingParameter(&'static str),

    /// Session creation failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Anything other than GET or HEAD outside the routed endpoints
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Static asset missing or rejected by the traversal guard
    #[error("Not found")]
    AssetNotFound,
}

impl RelayError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) | Self::AssetNotFound => StatusCode::NOT_FOUND,
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Registry(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Convert to a close code for an already-upgraded connection
    #[must_use]
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::SessionNotFound(_) => Some(CloseCode::SessionNotFound),
            _ => None,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Self::Registry(e) => {
                tracing::warn!(error = %e, "Session creation failed");
                (status, Json(ErrorResponse::new(e.code(), &e))).into_response()
            }
            Self::MethodNotAllowed => (
                status,
                [(header::ALLOW, HeaderValue::from_static("GET, HEAD"))],
                "Method not allowed",
            )
                .into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}
