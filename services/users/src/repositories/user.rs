//! PostgreSQL user repository

use async_trait::async_trait;
use common::error::DatabaseError;
use sqlx::PgPool;
use tracing::{debug, info};

use super::UserEngine;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewUserRecord, UpdateUserRecord, UserId, UserRecord};

/// Name of the unique constraint on `users.username`
pub const USERNAME_CONSTRAINT: &str = "users_username_key";

/// User repository backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a failed write, turning a username unique violation into a conflict
fn write_error(err: sqlx::Error, username: &str) -> StoreError {
    let err = DatabaseError::from(err);
    match err.unique_violation() {
        Some(USERNAME_CONSTRAINT) => StoreError::UniquenessConflict {
            username: username.to_string(),
        },
        _ => StoreError::Engine(err),
    }
}

#[async_trait]
impl UserEngine for PgUserRepository {
    async fn insert(&self, new_user: NewUserRecord) -> StoreResult<UserRecord> {
        info!("Creating new user: {}", new_user.username);

        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password, phone, admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password, phone, admin
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(new_user.phone)
        .bind(new_user.admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &new_user.username))
    }

    async fn update(&self, id: UserId, changes: UpdateUserRecord) -> StoreResult<UserRecord> {
        info!("Updating user: {}", id);

        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password = COALESCE($3, password),
                phone = CASE WHEN $4 THEN $5 ELSE phone END,
                admin = CASE WHEN $6 THEN $7 ELSE admin END
            WHERE id = $1
            RETURNING id, username, password, phone, admin
            "#,
        )
        .bind(id)
        .bind(changes.username.as_deref())
        .bind(changes.password.as_deref())
        .bind(changes.phone.is_some())
        .bind(changes.phone.flatten())
        .bind(changes.admin.is_some())
        .bind(changes.admin.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, changes.username.as_deref().unwrap_or_default()))?;

        row.ok_or(StoreError::NotFound(id))
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        debug!("Finding user by ID: {}", id);

        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password, phone, admin
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        debug!("Finding user by username: {}", username);

        // TEXT cannot hold U+0000, so no stored row can match
        if username.contains('\0') {
            return Ok(None);
        }

        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password, phone, admin
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> StoreResult<UserRecord> {
        info!("Deleting user: {}", id);

        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            DELETE FROM users
            WHERE id = $1
            RETURNING id, username, password, phone, admin
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
