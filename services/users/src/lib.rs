//! User record store
//!
//! Defines the persisted user account (username, password, optional phone
//! number and admin flag), validates candidate records, and stores them
//! through an engine that enforces username uniqueness.
//!
//! ```rust,no_run
//! use users::{MemoryUserRepository, UserCandidate, UserStore};
//!
//! # async fn demo() -> users::StoreResult<()> {
//! let store = UserStore::new(MemoryUserRepository::new());
//! let alice = store.create(UserCandidate::new("alice", "p1")).await?;
//! assert_eq!(store.find_by_username("alice").await?, Some(alice));
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;
pub mod validation;

pub use error::{StoreError, StoreResult};
pub use models::{NewUserRecord, UpdateUserRecord, UserId, UserRecord};
pub use repositories::{MemoryUserRepository, PgUserRepository, UserEngine};
pub use store::UserStore;
pub use validation::{UserCandidate, UserChanges, ValidationError};
