//! Forum Error Types
//!
//! Forum-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::PostId;
use thiserror::Error;

/// Forum-specific result type alias
pub type ForumResult<T> = Result<T, ForumError>;

/// Forum-specific error variants
#[derive(Debug, Error)]
pub enum ForumError {
    /// Empty or oversized title/body/category
    #[error("{0}")]
    Validation(String),

    /// Author email has no user identity
    #[error("Author does not exist")]
    UnknownAuthor,

    /// Referenced post does not exist
    #[error("Post {0} does not exist")]
    UnknownPost(PostId),

    /// Like target has no user identity
    #[error("User does not exist")]
    UnknownUser,

    /// No valid session
    #[error("Authentication required")]
    Unauthenticated,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForumError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForumError::Validation(_) => StatusCode::BAD_REQUEST,
            ForumError::UnknownAuthor | ForumError::UnknownPost(_) | ForumError::UnknownUser => {
                StatusCode::NOT_FOUND
            }
            ForumError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ForumError::Database(_) | ForumError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumError::Validation(_) => ErrorKind::BadRequest,
            ForumError::UnknownAuthor | ForumError::UnknownPost(_) | ForumError::UnknownUser => {
                ErrorKind::NotFound
            }
            ForumError::Unauthenticated => ErrorKind::Unauthorized,
            ForumError::Database(_) | ForumError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            ForumError::Database(_) | ForumError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ForumError::Database(e) => {
                tracing::error!(error = %e, "Forum database error");
            }
            ForumError::Internal(msg) => {
                tracing::error!(message = %msg, "Forum internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Forum error");
            }
        }
    }
}

impl IntoResponse for ForumError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for ForumError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::SessionInvalid => ForumError::Unauthenticated,
            AuthError::Validation(msg) => ForumError::Validation(msg),
            AuthError::Database(e) => ForumError::Database(e),
            other => ForumError::Internal(other.to_string()),
        }
    }
}
