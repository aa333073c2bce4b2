//! PostgreSQL access for the turn notifier.
//!
//! - [`create_pool`], [`health_check`], [`run_migrations`]: connection setup.
//! - [`repositories`]: zero-sized repo structs over `&PgPool`.
//! - [`directory`]: the [`UserDirectory`] lookup used by the resolver.

use sqlx::postgres::PgPoolOptions;

pub mod directory;
pub mod error;
pub mod models;
pub mod repositories;

pub use directory::{PgUserDirectory, UserDirectory};
pub use error::DirectoryError;

pub type DbPool = sqlx::PgPool;

/// Default pool size when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
