//! API errors and their HTTP rendering
//!
//! Failed logins answer `{"error": ...}`, rejected sessions `{"aviso": ...}`
//! and everything else `{"errors": [...]}`.

use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned for any failed login, whatever the cause
pub const INVALID_CREDENTIALS: &str = "Credenciais Inválidas";

/// Message returned when a protected endpoint is called without a valid session
pub const LOGIN_REQUIRED: &str = "É necessário efetuar o login antes de utilizar esse endpoint";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// Field constraints violated; each entry is a client-facing message
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad login credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Protected endpoint reached without an authenticated user
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
    }

    pub fn login_required() -> Self {
        ApiError::NotAuthenticated(LOGIN_REQUIRED.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => {
                ApiError::Validation(vec!["Email has already been taken".to_string()])
            }
            StoreError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(messages) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "errors": messages }))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "errors": [msg] })),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            ApiError::NotAuthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, json!({ "aviso": msg }))
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "errors": [msg] })),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "errors": ["An internal error occurred"] }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
