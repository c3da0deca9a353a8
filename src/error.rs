//! Error types for the query cache
//!
//! Provides unified error handling using thiserror. Producer failures are never
//! wrapped here: they belong to the caller and travel back unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the query cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Non-positive TTL, page, page size or batch size passed to the public API
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Cache key rejected by the store
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid request data on the admin API
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        // Every variant is a caller mistake
        let status = StatusCode::BAD_REQUEST;
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the query cache.
pub type Result<T> = std::result::Result<T, CacheError>;
