//! Error types for the user store

use common::error::DatabaseError;
use thiserror::Error;

use crate::models::UserId;
use crate::validation::ValidationError;

/// Failure of a store operation
///
/// Every operation is all-or-nothing: when one of these is returned, nothing
/// was written.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field is missing, empty or of the wrong type
    #[error("Invalid user record: {0}")]
    Validation(#[from] ValidationError),

    /// Another record already owns this username
    #[error("Username {username:?} is already taken")]
    UniquenessConflict { username: String },

    /// No record with this id exists
    #[error("User {0} not found")]
    NotFound(UserId),

    /// Transport or storage failure reported by the engine
    #[error("Storage engine error: {0}")]
    Engine(#[from] DatabaseError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::UniquenessConflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Engine(DatabaseError::from(err))
    }
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;
