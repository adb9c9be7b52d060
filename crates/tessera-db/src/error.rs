//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// A stored value could not be decoded into a domain type
    #[error("invalid stored value: {0}")]
    InvalidValue(String),

    /// Backend could not be reached
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for directory operations
pub type DbResult<T> = Result<T, DbError>;
