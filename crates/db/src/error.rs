/// Failure to reach or read the user directory.
///
/// This is infrastructure unavailability, not a missing user: a missing
/// user is `Ok(None)` from [`UserDirectory::get`](crate::UserDirectory::get).
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory database error: {0}")]
    Database(#[from] sqlx::Error),
}
