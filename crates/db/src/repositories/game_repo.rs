//! Repository for the `games` table.
//!
//! Writing a new `state` fires the `trg_games_enqueue_update` trigger,
//! which queues a [`GameUpdateTask`](crate::models::game_update_task::GameUpdateTask).

use sqlx::PgPool;

pub struct GameRepo;

impl GameRepo {
    /// Insert a new game document.
    pub async fn create(
        pool: &PgPool,
        id: &str,
        state: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO games (id, state) VALUES ($1, $2)")
            .bind(id)
            .bind(state)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Replace a game's state document.
    ///
    /// Returns `true` if the game exists.
    pub async fn update_state(
        pool: &PgPool,
        id: &str,
        state: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE games SET state = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(state)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
