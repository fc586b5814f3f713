//! Conversion of layer errors into HTTP error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{protocol::ErrorResponse, ServiceError};
use tracing::warn;

use crate::records::{StoreError, ValidationError};

/// Handler error: a [`ServiceError`] rendered as a JSON [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let service = match err {
            StoreError::Unavailable(_) => ServiceError::Unavailable(err.to_string()),
            StoreError::Duplicate(_) => ServiceError::Internal(err.to_string()),
        };
        Self(service)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::BadRequest(rejection.body_text()))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(ServiceError::BadRequest(err.to_string()))
    }
}
