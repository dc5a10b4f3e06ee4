//! Error types for enrolld.

use thiserror::Error;

/// Common error type for enrolld.
#[derive(Error, Debug)]
pub enum EnrolldError {
    /// Database error.
    ///
    /// Generic database error wrapping failures from any backend.
    /// Errors from sqlx are converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No account matches the given email.
    ///
    /// Surfaced distinctly for server-side logging; the web layer renders
    /// it to the end user identically to `InvalidCredential`.
    #[error("no account for {0}")]
    NotFound(String),

    /// Password verification failed.
    #[error("invalid credential")]
    InvalidCredential,

    /// Reset token is unknown, already consumed, or past its validity window.
    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken,

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Mail delivery error.
    #[error("mail error: {0}")]
    Mail(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for EnrolldError {
    fn from(e: sqlx::Error) -> Self {
        EnrolldError::Database(e.to_string())
    }
}

/// Result type alias for enrolld operations.
pub type Result<T> = std::result::Result<T, EnrolldError>;
