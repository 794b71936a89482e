//! Error types for the Autospec booking service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    services::{
        submission::{SubmitError, FAILURE_MESSAGE},
        validation::ValidationError,
    },
    store::StoreError,
};

/// Numeric error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadValue = 1,
    MissingRequired = 2,
    InvalidEmail = 3,
    StoreFailure = 4,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => AppError::Validation(e),
            SubmitError::Store(e) => AppError::Store(e),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(e) => {
                let code = match e {
                    ValidationError::MissingRequired => ErrorCode::MissingRequired,
                    ValidationError::InvalidEmail => ErrorCode::InvalidEmail,
                };
                (StatusCode::BAD_REQUEST, code, e.to_string())
            }
            // Logged where the write failed; users only get the generic message
            AppError::Store(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorCode::StoreFailure,
                FAILURE_MESSAGE.to_string(),
            ),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
