//! User directory lookup.
//!
//! [`UserDirectory`] is the seam the recipient resolver depends on.
//! [`PgUserDirectory`] backs it with the `users` table; tests substitute
//! in-memory implementations.

use async_trait::async_trait;
use turn_notify_core::UserRecord;

use crate::error::DirectoryError;
use crate::repositories::UserRepo;
use crate::DbPool;

/// Read-only, single-key lookup of directory users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by id. `Ok(None)` means the user does not exist.
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// [`UserDirectory`] over the PostgreSQL `users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: DbPool,
}

impl PgUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let user = UserRepo::find_by_id(&self.pool, user_id).await?;
        Ok(user.map(UserRecord::from))
    }
}
