//! Trigger envelope for one accepted game mutation.

use chrono::{DateTime, Utc};
use turn_notify_core::types::GameId;
use turn_notify_core::{CoreError, GameRecord};

/// A game transition delivered by the host, at least once per mutation.
///
/// Constructed from already-parsed records via [`GameUpdateEvent::new`] or
/// from stored documents via [`GameUpdateEvent::from_documents`].
#[derive(Debug, Clone)]
pub struct GameUpdateEvent {
    pub game_id: GameId,
    pub before: GameRecord,
    pub after: GameRecord,
    /// When the event was built (UTC).
    pub timestamp: DateTime<Utc>,
}

impl GameUpdateEvent {
    pub fn new(game_id: impl Into<GameId>, before: GameRecord, after: GameRecord) -> Self {
        Self {
            game_id: game_id.into(),
            before,
            after,
            timestamp: Utc::now(),
        }
    }

    /// Parse both snapshots from their stored JSON documents.
    ///
    /// Fails only if either document is not a JSON object.
    pub fn from_documents(
        game_id: impl Into<GameId>,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> Result<Self, CoreError> {
        let before = GameRecord::from_document(before)?;
        let after = GameRecord::from_document(after)?;
        Ok(Self::new(game_id, before, after))
    }
}
