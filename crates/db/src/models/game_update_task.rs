//! Queued game update tasks consumed by the worker.

use sqlx::FromRow;
use turn_notify_core::types::{DbId, GameId, Timestamp};

use super::status::StatusId;

/// Row from the `game_update_tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct GameUpdateTask {
    pub id: DbId,
    pub game_id: GameId,
    pub before_state: serde_json::Value,
    pub after_state: serde_json::Value,
    pub status_id: StatusId,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}
