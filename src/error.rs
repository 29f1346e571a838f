//! Application-wide error type and its `IntoResponse` mapping.
//!
//! Grounded in the `error.rs` pattern used across the example pack (one
//! `thiserror` enum, one hand-written `IntoResponse` impl) rather than the
//! teacher's ad hoc `anyhow::Result` handlers, because the query runtime
//! needs the precise 400/404/503 split called for in spec §6/§7.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Query parsing failed. In practice this is vanishingly rare (§4.1 never
/// fails on well-formed input), but a pathological source-hint prefix or an
/// oversized raw query is rejected here rather than downstream.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("query exceeds maximum length of {max} characters")]
    TooLong { max: usize },
    #[error("malformed mc_id: {0}")]
    MalformedId(String),
}

/// The inverted index could not be reached or queried.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index unavailable: {0}")]
    Unavailable(String),
    #[error("index query failed: {0}")]
    Query(#[from] tantivy::TantivyError),
}

/// A brokered provider call failed. Never escapes [`crate::providers`] — it
/// is rendered to a message string and absorbed into `ProviderOutcome.error`
/// before the fan-out orchestrator ever sees it.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("request to {provider} timed out")]
    Timeout { provider: &'static str },
    #[error("{provider} returned HTTP {status}")]
    Http { provider: &'static str, status: u16 },
    #[error("{provider} transport error: {message}")]
    Transport { provider: &'static str, message: String },
}

/// The one error type that ever crosses a handler boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(#[from] ParseError),

    #[error("index unavailable: {0}")]
    IndexUnavailable(#[from] IndexError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Self::IndexUnavailable(e) => {
                tracing::error!(error = %e, "index unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "index_unavailable")
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorBody {
            error: kind,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let err = AppError::BadRequest(ParseError::TooLong { max: 512 });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::NotFound("movie_abc".to_string());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn index_unavailable_maps_to_503() {
        let err = AppError::IndexUnavailable(IndexError::Unavailable("reader closed".into()));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
