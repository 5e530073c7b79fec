//! HTTP error type for the shop service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::services::{AccountError, OrderError};

/// Error returned by every handler
#[derive(Error, Debug)]
pub enum ApiError {
    /// Signup with an email or username already on file
    #[error("User already registered")]
    DuplicateAccount,

    /// Login failed; the cause is deliberately not disclosed
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Missing, invalid or expired bearer token
    #[error("Could not validate credentials")]
    Unauthorized,

    /// Request body could not be read as JSON
    #[error("{0}")]
    BadRequest(String),

    /// Request payload failed validation
    #[error("{0}")]
    Validation(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::Validation(msg),
            AccountError::DuplicateAccount => ApiError::DuplicateAccount,
            AccountError::InvalidCredentials => ApiError::InvalidCredentials,
            AccountError::InvalidToken(_) | AccountError::UnknownSubject => ApiError::Unauthorized,
            err @ (AccountError::TokenIssue(_)
            | AccountError::Persistence(_)
            | AccountError::Password(_)
            | AccountError::Task(_)) => {
                error!("Account operation failed: {}", err);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => ApiError::Validation(msg),
            OrderError::Persistence(e) => {
                error!("Order operation failed: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Validation(rejection.body_text()),
            _ => ApiError::BadRequest(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::DuplicateAccount | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
