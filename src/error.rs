use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::jwt::TokenError;
use crate::auth::services::AuthError;
use crate::schedule::EntityStoreError;
use crate::tz::BadTimezone;
use crate::users::{UserError, UserStoreError};
use crate::validation::ValidationError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Update or delete of an id that is not stored.
    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unprocessable(_) => "UNPROCESSABLE",
            Self::Conflict(_) => "ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Maps a store miss on a write path, where the id came from the client.
    pub fn unprocessable(err: EntityStoreError) -> Self {
        Self::Unprocessable(err.to_string())
    }

    /// Sign-in never tells the caller which step failed past validation.
    pub fn sign_in(err: AuthError) -> Self {
        match err {
            AuthError::Validation(v) => v.into(),
            AuthError::Internal(e) => Self::Internal(e),
            AuthError::Token(TokenError::Signing(e)) => Self::Internal(e),
            _ => Self::InvalidCredentials,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "internal api error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<BadTimezone> for ApiError {
    fn from(err: BadTimezone) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => Self::Internal(e),
            TokenError::Verification => Self::InvalidToken,
        }
    }
}

impl From<UserStoreError> for ApiError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::NotFound => Self::NotFound(err.to_string()),
            UserStoreError::AlreadyExists => Self::Conflict(err.to_string()),
            UserStoreError::Validation(v) => v.into(),
        }
    }
}

impl From<EntityStoreError> for ApiError {
    fn from(err: EntityStoreError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(v) => v.into(),
            AuthError::AuthenticationFailed => Self::InvalidCredentials,
            AuthError::Token(e) => e.into(),
            AuthError::Store(e) => e.into(),
            AuthError::Internal(e) => Self::Internal(e),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Store(e) => e.into(),
            UserError::Hash(e) => Self::Internal(e),
            UserError::Internal(e) => Self::Internal(e.to_string()),
        }
    }
}
