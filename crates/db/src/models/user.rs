//! Directory user rows.

use sqlx::FromRow;
use turn_notify_core::types::{Timestamp, UserId};
use turn_notify_core::UserRecord;

/// Row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub fcm_tokens: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            fcm_tokens: user.fcm_tokens,
        }
    }
}
