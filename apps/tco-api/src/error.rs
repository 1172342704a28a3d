//! # API Error Type
//!
//! What HTTP clients see when a request fails.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CoreError::Validation     ──► 400  VALIDATION_ERROR     + field errors │
//! │  CoreError::Configuration  ──► 422  CONFIGURATION_ERROR  + hint         │
//! │  anything else             ──► 500  INTERNAL                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Invalid configuration",
//!   "errors": [
//!     { "field": "financial.analysis_years", "message": "financial.analysis_years must be between 1 and 10 (got 12)" }
//!   ]
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tco_core::{CoreError, ValidationError};

#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Field-level details, validation failures only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Valid input the engine cannot satisfy (422)
    ConfigurationError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::ConfigurationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn validation(errors: &[ValidationError]) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: "Invalid configuration".to_string(),
            errors: errors.iter().map(FieldError::from).collect(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::Validation(errors) => ApiError::validation(errors),
            CoreError::Configuration(_) => {
                ApiError::new(ErrorCode::ConfigurationError, err.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(std::slice::from_ref(&err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
