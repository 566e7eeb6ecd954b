//! In-process user repository
//!
//! Rows and the username index live behind one lock, so the uniqueness check
//! and the write it guards happen as a single step. Nothing survives the
//! process; use it for tests and embedding.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::UserEngine;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewUserRecord, UpdateUserRecord, UserId, UserRecord};

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<UserId, UserRecord>,
    /// Unique index on username
    by_username: HashMap<String, UserId>,
    /// Last assigned id; ids start at 1 and are never reused
    last_id: i64,
}

/// User repository held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserEngine for MemoryUserRepository {
    async fn insert(&self, new_user: NewUserRecord) -> StoreResult<UserRecord> {
        info!("Creating new user: {}", new_user.username);

        let mut tables = self.tables.lock().await;
        if tables.by_username.contains_key(&new_user.username) {
            return Err(StoreError::UniquenessConflict {
                username: new_user.username,
            });
        }

        tables.last_id += 1;
        let id = UserId(tables.last_id);
        let user = new_user.into_record(id);

        tables.by_username.insert(user.username.clone(), id);
        tables.rows.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: UserId, changes: UpdateUserRecord) -> StoreResult<UserRecord> {
        info!("Updating user: {}", id);

        let mut tables = self.tables.lock().await;
        let Tables {
            rows, by_username, ..
        } = &mut *tables;

        let user = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(username) = &changes.username {
            match by_username.get(username) {
                Some(owner) if *owner != id => {
                    return Err(StoreError::UniquenessConflict {
                        username: username.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    by_username.remove(&user.username);
                    by_username.insert(username.clone(), id);
                }
            }
        }

        user.apply(&changes);
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        debug!("Finding user by ID: {}", id);

        let tables = self.tables.lock().await;
        Ok(tables.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        debug!("Finding user by username: {}", username);

        let tables = self.tables.lock().await;
        Ok(tables
            .by_username
            .get(username)
            .and_then(|id| tables.rows.get(id))
            .cloned())
    }

    async fn delete(&self, id: UserId) -> StoreResult<UserRecord> {
        info!("Deleting user: {}", id);

        let mut tables = self.tables.lock().await;
        let user = tables.rows.remove(&id).ok_or(StoreError::NotFound(id))?;
        tables.by_username.remove(&user.username);

        Ok(user)
    }

    async fn count(&self) -> StoreResult<u64> {
        let tables = self.tables.lock().await;
        Ok(tables.rows.len() as u64)
    }
}
