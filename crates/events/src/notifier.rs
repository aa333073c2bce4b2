//! Turn notification entry point.
//!
//! [`TurnNotifier::handle`] processes one [`GameUpdateEvent`] to completion:
//! evaluate the transition, resolve the recipient's addresses, dispatch.
//! It holds no per-invocation state, so duplicate or concurrent events are
//! each handled independently.

use std::sync::Arc;

use turn_notify_core::types::UserId;
use turn_notify_core::{evaluate, Decision, NotificationPayload, SkipReason, Turn};
use turn_notify_db::{DirectoryError, UserDirectory};

use crate::delivery::PushChannel;
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::event::GameUpdateEvent;
use crate::resolver::RecipientResolver;

// ---------------------------------------------------------------------------
// Error / outcome
// ---------------------------------------------------------------------------

/// The only failure `handle` propagates: the directory was unreachable.
/// Push failures are swallowed by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// What happened to one event.
#[derive(Debug)]
pub enum HandleOutcome {
    /// The evaluator decided no notification was warranted.
    Skipped(SkipReason),
    /// A recipient was identified and dispatch was attempted.
    Dispatched {
        recipient_user_id: UserId,
        turn: Turn,
        outcome: DispatchOutcome,
    },
}

// ---------------------------------------------------------------------------
// TurnNotifier
// ---------------------------------------------------------------------------

/// Notifies the player whose turn it now is.
///
/// Collaborators are injected once at start-up and shared across all
/// invocations.
#[derive(Clone)]
pub struct TurnNotifier {
    resolver: RecipientResolver,
    dispatcher: Dispatcher,
}

impl TurnNotifier {
    pub fn new(directory: Arc<dyn UserDirectory>, channel: Arc<dyn PushChannel>) -> Self {
        Self {
            resolver: RecipientResolver::new(directory),
            dispatcher: Dispatcher::new(channel),
        }
    }

    /// Handle one accepted game mutation.
    pub async fn handle(&self, event: &GameUpdateEvent) -> Result<HandleOutcome, HandleError> {
        let (user_id, turn, game_id) =
            match evaluate(&event.before, &event.after, &event.game_id) {
                Decision::Skip(reason) => {
                    tracing::info!(
                        game_id = %event.game_id,
                        reason = reason.as_str(),
                        "No turn notification needed"
                    );
                    return Ok(HandleOutcome::Skipped(reason));
                }
                Decision::Notify {
                    recipient_user_id,
                    turn,
                    game_id,
                } => (recipient_user_id, turn, game_id),
            };

        tracing::info!(%game_id, %turn, user_id = %user_id, "Next turn, notifying player");

        let addresses = self.resolver.resolve(&user_id).await.map_err(|e| {
            tracing::error!(%game_id, user_id = %user_id, error = %e, "Directory lookup failed");
            e
        })?;

        let payload = NotificationPayload::for_turn(&game_id, turn);
        let outcome = self.dispatcher.dispatch(&addresses, &payload).await;

        Ok(HandleOutcome::Dispatched {
            recipient_user_id: user_id,
            turn,
            outcome,
        })
    }
}
