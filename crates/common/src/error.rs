//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Unavailable`] → 503
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request carried an invalid id or failed field validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No vehicle record exists for the requested id.
    #[error("not found: {0}")]
    NotFound(String),

    /// The record store is temporarily unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }

    /// Message that is safe to return to the caller.
    ///
    /// Client errors echo their detail; server errors are reduced to a fixed
    /// message so internal detail only ever reaches the log.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::BadRequest(m) | ServiceError::NotFound(m) => m.clone(),
            ServiceError::Unavailable(_) => "service temporarily unavailable".into(),
            ServiceError::Internal(_) => "an internal error occurred".into(),
        }
    }
}
