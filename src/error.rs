//! Error types for the indexing engine
//!
//! Provides unified error handling using thiserror. Engine operations report
//! failures as values; the HTTP host maps them onto status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Index Error Enum ==
/// Unified error type for the cache, the grid and the host shim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Key is empty or too long
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key not found (or expired) in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored value cannot be coerced to a number
    #[error("Value is not numeric: {0}")]
    NotNumeric(String),

    /// Kind was not declared when the grid was built
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// Entity id is already tracked by the grid
    #[error("Duplicate entity id: {0}")]
    DuplicateId(String),

    /// Entity id is not tracked by the grid
    #[error("Unknown entity id: {0}")]
    UnknownId(String),

    /// Grid cell size must be positive and finite
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(f64),

    /// Position has a non-finite coordinate
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for IndexError {
    fn into_response(self) -> Response {
        let status = match &self {
            IndexError::NotFound(_) | IndexError::UnknownId(_) => StatusCode::NOT_FOUND,
            IndexError::DuplicateId(_) => StatusCode::CONFLICT,
            IndexError::NotNumeric(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IndexError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            IndexError::InvalidKey(_)
            | IndexError::UnknownKind(_)
            | IndexError::InvalidCellSize(_)
            | IndexError::InvalidPosition(_)
            | IndexError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the indexing engine.
pub type Result<T> = std::result::Result<T, IndexError>;
