//! Error types for ytshelf.

use thiserror::Error;

use crate::youtube::ResolveError;

/// Common error type for ytshelf.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No valid user identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Missing or empty required field.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A channel URL could not be resolved to a channel identifier.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// The feed provider or another upstream call failed.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ShelfError {
    fn from(e: sqlx::Error) -> Self {
        ShelfError::Database(e.to_string())
    }
}

/// Result type alias for ytshelf operations.
pub type Result<T> = std::result::Result<T, ShelfError>;
