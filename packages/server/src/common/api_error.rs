use thiserror::Error;

use crate::common::auth::AuthError;

/// The one error taxonomy every portal operation speaks.
///
/// Each variant fixes both the HTTP status and what the caller should do
/// next: re-authenticate, give up, refetch, or correct the input. Anything
/// not in this list is an `Internal` and deliberately opaque on the wire.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or unusable credential. Recoverable by signing in again.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated but not allowed. Terminal for this action.
    #[error("{0}")]
    AuthorizationError(String),

    /// The record was not in the state the operation requires. The caller
    /// holds a stale view and should refetch.
    #[error("{0}")]
    ConflictError(String),

    /// Malformed input; correct and resubmit.
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    /// Everything unexpected. Logged server-side; message never reaches
    /// the wire.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::AuthorizationError(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::ConflictError(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Stable machine-readable name, used as the `error` field of the
    /// response body.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::AuthorizationError(_) => "authorization_error",
            ApiError::ConflictError(_) => "conflict_error",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired | AuthError::InvalidToken => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::AdminRequired | AuthError::SubmissionsBanned => {
                ApiError::AuthorizationError(err.to_string())
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.into())
    }
}
