//! Storage engines for user records
//!
//! An engine owns durable storage and the username unique index. Engines
//! must decide uniqueness atomically with the write and report a violation
//! as [`StoreError::UniquenessConflict`](crate::error::StoreError).

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{NewUserRecord, UpdateUserRecord, UserId, UserRecord};

pub mod memory;
pub mod user;

pub use memory::MemoryUserRepository;
pub use user::PgUserRepository;

/// Persistence contract for user records
#[async_trait]
pub trait UserEngine: Send + Sync {
    /// Insert a record and return it with its newly assigned id
    async fn insert(&self, new_user: NewUserRecord) -> StoreResult<UserRecord>;

    /// Apply changes to an existing record and return the result
    ///
    /// Fails with `NotFound` if `id` does not exist.
    async fn update(&self, id: UserId, changes: UpdateUserRecord) -> StoreResult<UserRecord>;

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    /// Remove a record and return what was removed
    ///
    /// Fails with `NotFound` if `id` does not exist.
    async fn delete(&self, id: UserId) -> StoreResult<UserRecord>;

    async fn count(&self) -> StoreResult<u64>;
}
