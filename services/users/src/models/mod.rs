//! User store models

pub mod user;

// Re-export for convenience
pub use user::{NewUserRecord, UpdateUserRecord, UserId, UserRecord};
