/// Database primary keys for queue rows are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of a game document.
pub type GameId = String;

/// Identifier of a user in the directory.
pub type UserId = String;
