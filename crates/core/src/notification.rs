//! Push notification content for a turn change.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::Turn;

/// Title shown on every turn notification.
pub const TURN_TITLE: &str = "Your move in Tic Tac Toe!";

/// Data key carrying the game id.
pub const DATA_GAME_ID: &str = "gameId";

/// Data key carrying the turn symbol.
pub const DATA_CURRENT_TURN: &str = "currentTurn";

/// A display notification plus structured data, built per delivery and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl NotificationPayload {
    /// Compose the "your move" notification for `turn` in `game_id`.
    pub fn for_turn(game_id: &str, turn: Turn) -> Self {
        let data = BTreeMap::from([
            (DATA_GAME_ID.to_string(), game_id.to_string()),
            (DATA_CURRENT_TURN.to_string(), turn.as_str().to_string()),
        ]);

        Self {
            title: TURN_TITLE.to_string(),
            body: format!("It's your turn as {turn}."),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_payload_carries_game_and_turn() {
        let payload = NotificationPayload::for_turn("g-42", Turn::O);

        assert_eq!(payload.title, "Your move in Tic Tac Toe!");
        assert_eq!(payload.body, "It's your turn as O.");
        assert_eq!(payload.data.get("gameId").map(String::as_str), Some("g-42"));
        assert_eq!(payload.data.get("currentTurn").map(String::as_str), Some("O"));
        assert_eq!(payload.data.len(), 2);
    }
}
