//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, fcm_tokens, created_at, updated_at";

/// Read access to the user directory, plus token registration.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a user or replace its token list.
    ///
    /// `None` stores SQL `NULL`, i.e. a user with no token field at all.
    pub async fn upsert(
        pool: &PgPool,
        id: &str,
        fcm_tokens: Option<&[String]>,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, fcm_tokens) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET fcm_tokens = EXCLUDED.fcm_tokens, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(fcm_tokens)
            .fetch_one(pool)
            .await
    }
}
