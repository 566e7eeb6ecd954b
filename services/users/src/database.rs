//! Schema management for the user store

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

/// Migrations embedded from `services/users/migrations`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create or upgrade the `users` table and its constraints
///
/// # Arguments
/// * `pool` - PostgreSQL connection pool
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    info!("Applying user store migrations");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("User store schema is up to date");
    Ok(())
}
