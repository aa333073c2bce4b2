//! Game update task poller.
//!
//! Polls `game_update_tasks` every `poll_interval`, claims pending tasks
//! with `SELECT FOR UPDATE SKIP LOCKED` via
//! [`GameUpdateTaskRepo::claim_next`], and feeds each one to
//! [`TurnNotifier::handle`]. Running tasks whose claim is older than
//! `stale_after` are returned to the queue on a separate timer.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use turn_notify_db::models::game_update_task::GameUpdateTask;
use turn_notify_db::models::status::TaskStatus;
use turn_notify_db::repositories::GameUpdateTaskRepo;
use turn_notify_events::{GameUpdateEvent, HandleOutcome, TurnNotifier};

/// Lower bound for the poll interval; `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Lower bound for the stale-claim sweep interval.
const MIN_REQUEUE_INTERVAL: Duration = Duration::from_secs(1);

/// Background consumer of the game update task queue.
pub struct TaskPoller {
    pool: PgPool,
    notifier: TurnNotifier,
    poll_interval: Duration,
    stale_after: Duration,
}

impl TaskPoller {
    pub fn new(
        pool: PgPool,
        notifier: TurnNotifier,
        poll_interval: Duration,
        stale_after: Duration,
    ) -> Self {
        Self {
            pool,
            notifier,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            stale_after,
        }
    }

    /// Run the poll loop until the cancellation token is triggered.
    ///
    /// A task that is already being handled is finished before the loop
    /// exits.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        let mut requeue_ticker = tokio::time::interval(self.stale_after.max(MIN_REQUEUE_INTERVAL));
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            stale_after_secs = self.stale_after.as_secs(),
            "Task poller started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Task poller shutting down");
                    break;
                }
                _ = requeue_ticker.tick() => {
                    if let Err(e) = self.requeue_stale().await {
                        tracing::error!(error = %e, "Stale task sweep failed");
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.drain(&cancel).await {
                        tracing::error!(error = %e, "Poll cycle failed");
                    }
                }
            }
        }
    }

    /// Process pending tasks until the queue is empty or `cancel` fires.
    ///
    /// Returns the number of tasks processed.
    pub async fn drain(
        &self,
        cancel: &CancellationToken,
    ) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
        let mut processed = 0;
        while !cancel.is_cancelled() {
            match self.process_next().await? {
                Some(_) => processed += 1,
                None => break,
            }
        }
        if processed > 0 {
            tracing::debug!(processed, "Poll cycle drained tasks");
        }
        Ok(processed)
    }

    /// Claim and process one task.
    ///
    /// Returns the terminal status recorded for the task, or `None` if the
    /// queue was empty.
    pub async fn process_next(&self) -> Result<Option<TaskStatus>, sqlx::Error> {
        let Some(task) = GameUpdateTaskRepo::claim_next(&self.pool).await? else {
            return Ok(None);
        };

        tracing::debug!(task_id = task.id, game_id = %task.game_id, "Task claimed");

        let status = match self.handle_task(&task).await {
            Ok(()) => {
                GameUpdateTaskRepo::complete(&self.pool, task.id).await?;
                TaskStatus::Completed
            }
            Err(message) => {
                tracing::error!(
                    task_id = task.id,
                    game_id = %task.game_id,
                    error = %message,
                    "Task failed",
                );
                GameUpdateTaskRepo::fail(&self.pool, task.id, &message).await?;
                TaskStatus::Failed
            }
        };

        Ok(Some(status))
    }

    /// Return abandoned claims to the queue.
    pub async fn requeue_stale(&self) -> Result<u64, sqlx::Error> {
        let requeued = GameUpdateTaskRepo::requeue_stale(&self.pool, self.stale_after).await?;
        if requeued > 0 {
            tracing::warn!(requeued, "Requeued stale game update tasks");
        }
        Ok(requeued)
    }

    /// Run one task through the notifier. `Err` carries the message stored
    /// on the failed task.
    async fn handle_task(&self, task: &GameUpdateTask) -> Result<(), String> {
        let event = GameUpdateEvent::from_documents(
            task.game_id.clone(),
            task.before_state.clone(),
            task.after_state.clone(),
        )
        .map_err(|e| format!("Malformed game document: {e}"))?;

        match self.notifier.handle(&event).await {
            Ok(HandleOutcome::Skipped(reason)) => {
                tracing::debug!(task_id = task.id, reason = reason.as_str(), "Task skipped");
                Ok(())
            }
            Ok(HandleOutcome::Dispatched { outcome, .. }) => {
                tracing::debug!(
                    task_id = task.id,
                    delivered = outcome.delivered_count(),
                    rejected = outcome.rejected_count(),
                    "Task dispatched",
                );
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        }
    }
}
