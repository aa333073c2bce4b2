//! Repository for the `game_update_tasks` queue.

use std::time::Duration;

use sqlx::PgPool;
use turn_notify_core::types::DbId;

use crate::models::game_update_task::GameUpdateTask;
use crate::models::status::TaskStatus;

/// Column list for `game_update_tasks` queries.
const COLUMNS: &str = "\
    id, game_id, before_state, after_state, status_id, error_message, \
    created_at, claimed_at, completed_at";

/// Queue operations for game update tasks.
pub struct GameUpdateTaskRepo;

impl GameUpdateTaskRepo {
    /// Queue a pending task for a game transition.
    pub async fn enqueue(
        pool: &PgPool,
        game_id: &str,
        before: &serde_json::Value,
        after: &serde_json::Value,
    ) -> Result<GameUpdateTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO game_update_tasks (game_id, before_state, after_state, status_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GameUpdateTask>(&query)
            .bind(game_id)
            .bind(before)
            .bind(after)
            .bind(TaskStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest pending task.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same row.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<GameUpdateTask>, sqlx::Error> {
        let query = format!(
            "UPDATE game_update_tasks \
             SET status_id = $1, claimed_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM game_update_tasks \
                 WHERE status_id = $2 \
                 ORDER BY id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GameUpdateTask>(&query)
            .bind(TaskStatus::Running.id())
            .bind(TaskStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a task as completed.
    pub async fn complete(pool: &PgPool, task_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE game_update_tasks SET status_id = $2, completed_at = NOW() WHERE id = $1",
        )
        .bind(task_id)
        .bind(TaskStatus::Completed.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a task as failed. Failed tasks are not retried automatically.
    pub async fn fail(pool: &PgPool, task_id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE game_update_tasks \
             SET status_id = $2, error_message = $3, completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(task_id)
        .bind(TaskStatus::Failed.id())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Return running tasks claimed longer than `older_than` ago to pending.
    ///
    /// Covers a worker that died between claim and completion. Returns the
    /// number of tasks requeued.
    pub async fn requeue_stale(pool: &PgPool, older_than: Duration) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE game_update_tasks \
             SET status_id = $1, claimed_at = NULL \
             WHERE status_id = $2 \
               AND claimed_at < NOW() - make_interval(secs => $3)",
        )
        .bind(TaskStatus::Pending.id())
        .bind(TaskStatus::Running.id())
        .bind(older_than.as_secs_f64())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Option<GameUpdateTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM game_update_tasks WHERE id = $1");
        sqlx::query_as::<_, GameUpdateTask>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks for a game, oldest first.
    pub async fn list_for_game(
        pool: &PgPool,
        game_id: &str,
    ) -> Result<Vec<GameUpdateTask>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM game_update_tasks WHERE game_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, GameUpdateTask>(&query)
            .bind(game_id)
            .fetch_all(pool)
            .await
    }
}
