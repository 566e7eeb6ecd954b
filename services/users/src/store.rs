//! User record store
//!
//! Input is validated once here and handed to a [`UserEngine`]. Username
//! uniqueness is decided by the engine's unique index as part of the write.

use serde_json::Value;

use crate::error::StoreResult;
use crate::models::{UserId, UserRecord};
use crate::repositories::UserEngine;
use crate::validation::{UserCandidate, UserChanges, validate_username};

/// Typed façade over a user storage engine
#[derive(Debug, Clone)]
pub struct UserStore<E> {
    engine: E,
}

impl<E: UserEngine> UserStore<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Validate a candidate and persist it
    ///
    /// # Errors
    /// * `Validation` - username or password missing, empty or mistyped
    /// * `UniquenessConflict` - the username is taken
    /// * `Engine` - the storage engine failed
    pub async fn create(&self, candidate: UserCandidate) -> StoreResult<UserRecord> {
        let new_user = candidate.validate()?;
        self.engine.insert(new_user).await
    }

    /// Decode untyped input, validate it and persist it
    pub async fn create_json(&self, candidate: Value) -> StoreResult<UserRecord> {
        self.create(UserCandidate::from_json(candidate)?).await
    }

    /// Apply a partial update to an existing record
    ///
    /// Setting a record's username to its current value is not a conflict.
    ///
    /// # Errors
    /// * `NotFound` - no record has this id
    /// * `Validation` - a changed field is empty or mistyped
    /// * `UniquenessConflict` - the new username belongs to another record
    /// * `Engine` - the storage engine failed
    pub async fn update(&self, id: UserId, changes: UserChanges) -> StoreResult<UserRecord> {
        let changes = changes.validate()?;
        self.engine.update(id, changes).await
    }

    /// Decode an untyped change set and apply it
    pub async fn update_json(&self, id: UserId, changes: Value) -> StoreResult<UserRecord> {
        self.update(id, UserChanges::from_json(changes)?).await
    }

    /// Look up a record by exact, case-sensitive username
    ///
    /// Absence is `Ok(None)`, not an error. A name that could never pass
    /// validation is absent without consulting the engine.
    pub async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        if validate_username(username).is_err() {
            return Ok(None);
        }

        self.engine.find_by_username(username).await
    }

    pub async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        self.engine.find_by_id(id).await
    }

    /// Delete a record, returning it as confirmation
    pub async fn delete(&self, id: UserId) -> StoreResult<UserRecord> {
        self.engine.delete(id).await
    }

    pub async fn count(&self) -> StoreResult<u64> {
        self.engine.count().await
    }
}
