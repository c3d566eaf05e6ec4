//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed validation (empty field, malformed email, password policy)
    #[error("{0}")]
    Validation(String),

    /// Email already registered
    #[error("Email is already registered")]
    EmailTaken,

    /// Sign-in for an email with no identity
    ///
    /// Renders exactly like `WrongPassword`; only the logs tell them apart.
    #[error("Invalid credentials")]
    UnknownAccount,

    /// Sign-in with a wrong password
    #[error("Invalid credentials")]
    WrongPassword,

    /// Session missing, forged, unknown, expired, or bound to a removed identity
    #[error("Authentication required")]
    SessionInvalid,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::UnknownAccount | AuthError::WrongPassword | AuthError::SessionInvalid => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::UnknownAccount | AuthError::WrongPassword | AuthError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// True for failed sign-in attempts, whatever the cause
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, AuthError::UnknownAccount | AuthError::WrongPassword)
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            // Storage details stay in the logs
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            AuthError::SessionInvalid => AppError::unauthorized(self.to_string())
                .with_action("Please sign in"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::UnknownAccount => {
                tracing::warn!("Sign-in attempt for unknown account");
            }
            AuthError::WrongPassword => {
                tracing::warn!("Sign-in attempt with wrong password");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.message().to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}
