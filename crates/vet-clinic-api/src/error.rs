//! API error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vet_clinic_core::ClinicError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Clinic(#[from] ClinicError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Clinic(e) => match e {
                ClinicError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                ClinicError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ClinicError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                ClinicError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                ClinicError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
                ClinicError::Persistence(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR")
                }
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, ApiError::Clinic(e) if e.is_retryable())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            message: self.to_string(),
            code: code.to_string(),
            retryable: self.retryable(),
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use vet_clinic_core::ResourceKind;

    #[test]
    fn test_not_found_and_forbidden_map_apart() {
        let missing = ApiError::from(ClinicError::not_found(ResourceKind::Pet, "p1"));
        let denied = ApiError::from(ClinicError::forbidden(ResourceKind::Pet, "p1"));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(denied.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_unavailable_is_retryable() {
        let err = ApiError::from(ClinicError::Unavailable("database is locked".into()));
        assert!(err.retryable());
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = ApiError::from(ClinicError::Validation("name is required".into()));
        assert!(!err.retryable());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
