//! Custom error types for the common library
//!
//! Errors raised by the storage engine layer. Services wrap these in their
//! own taxonomies rather than exposing sqlx directly.

use sqlx::Error as SqlxError;
use sqlx::error::DatabaseError as _;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Name of the violated unique constraint, if this is a unique violation.
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            DatabaseError::Query(SqlxError::Database(db)) if db.is_unique_violation() => {
                Some(db.constraint().unwrap_or_default())
            }
            _ => None,
        }
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) | SqlxError::Tls(_) => {
                DatabaseError::Connection(err)
            }
            other => DatabaseError::Query(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
