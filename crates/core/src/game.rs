//! Game record snapshot as stored in the `games.state` document.
//!
//! The stored document has a loose shape: any field may be missing, `null`,
//! or of an unexpected type. Every field here is optional and deserializes
//! leniently, so a bad field reads as absent instead of failing the whole
//! record. The board is the exception: it is kept verbatim because turn
//! detection compares it cell for cell. Unknown fields (e.g. `lastUpdated`)
//! are ignored.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_FINISHED: &str = "finished";

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// Whose move is next. Also used as the mark stored in a board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    X,
    O,
}

impl Turn {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a game. Values other than `active` / `finished`
/// are preserved verbatim in [`GameStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Finished,
    Other(String),
}

impl GameStatus {
    /// Convert from the stored string value.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            STATUS_ACTIVE => Self::Active,
            STATUS_FINISHED => Self::Finished,
            other => Self::Other(other.to_string()),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Finished => STATUS_FINISHED,
            Self::Other(s) => s,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Serialize for GameStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GameStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str_value(&s))
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// The board exactly as stored.
///
/// Cell encoding is left to the client, so the grid is kept as raw JSON and
/// compared structurally: order- and value-sensitive over every cell, nested
/// rows included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board(serde_json::Value);

impl Board {
    pub fn from_value(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Build a flat board, writing an empty cell as `""`.
    pub fn from_cells(cells: &[Option<Turn>]) -> Self {
        Self(serde_json::Value::Array(
            cells
                .iter()
                .map(|cell| cell.map_or("", Turn::as_str).into())
                .collect(),
        ))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// A player slot, optionally bound to a directory user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Seat {
    pub fn occupied_by(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    /// The bound user id. An empty string counts as unfilled.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }
}

// ---------------------------------------------------------------------------
// GameRecord
// ---------------------------------------------------------------------------

/// One snapshot of a two-player game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<Turn>,

    #[serde(default, deserialize_with = "raw_board", skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub player_x: Option<Seat>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub player_o: Option<Seat>,
}

impl GameRecord {
    /// Parse a stored game document.
    ///
    /// Only fails when the document is not a JSON object; individual fields
    /// never cause an error.
    pub fn from_document(document: serde_json::Value) -> Result<Self, CoreError> {
        if !document.is_object() {
            return Err(CoreError::Validation(format!(
                "game document must be a JSON object, got {document}"
            )));
        }
        serde_json::from_value(document).map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// The seat that plays `turn`, if present.
    pub fn seat(&self, turn: Turn) -> Option<&Seat> {
        match turn {
            Turn::X => self.player_x.as_ref(),
            Turn::O => self.player_o.as_ref(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_ref().is_some_and(GameStatus::is_active)
    }
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

/// Deserialize `T`, mapping any shape mismatch to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Any present board value is kept, `null` included, so that `null` and a
/// missing board stay distinguishable.
fn raw_board<'de, D>(deserializer: D) -> Result<Option<Board>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(|value| Some(Board(value)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_document() {
        let record = GameRecord::from_document(json!({
            "status": "active",
            "currentTurn": "O",
            "board": ["X", null, null, null, null, null, null, null, null],
            "playerX": { "userId": "u1" },
            "playerO": { "userId": "u2" },
            "lastUpdated": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.status, Some(GameStatus::Active));
        assert_eq!(record.current_turn, Some(Turn::O));
        assert_eq!(
            record.board.as_ref().map(Board::as_value),
            Some(&json!(["X", null, null, null, null, null, null, null, null]))
        );
        assert_eq!(record.seat(Turn::X).and_then(Seat::user_id), Some("u1"));
        assert_eq!(record.seat(Turn::O).and_then(Seat::user_id), Some("u2"));
    }

    #[test]
    fn missing_fields_read_as_absent() {
        let record = GameRecord::from_document(json!({})).unwrap();
        assert_eq!(record, GameRecord::default());
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let record = GameRecord::from_document(json!({
            "status": 3,
            "currentTurn": "Z",
            "board": "not-a-board",
            "playerX": "u1",
            "playerO": { "userId": 42 }
        }))
        .unwrap();

        assert!(record.status.is_none());
        assert!(record.current_turn.is_none());
        assert_eq!(record.board, Some(Board::from_value(json!("not-a-board"))));
        assert!(record.player_x.is_none());
        assert_eq!(record.player_o, Some(Seat::default()));
    }

    #[test]
    fn board_is_kept_verbatim() {
        let record = GameRecord::from_document(json!({
            "board": [["x", "", ""], ["", "o", ""], ["", "", ""]]
        }))
        .unwrap();

        assert_eq!(
            record.board.map(|b| b.as_value().clone()),
            Some(json!([["x", "", ""], ["", "o", ""], ["", "", ""]]))
        );
    }

    #[test]
    fn boards_differing_in_any_cell_are_unequal() {
        let parse = |board| GameRecord::from_document(json!({ "board": board })).unwrap().board;

        assert_ne!(parse(json!([["", "", ""]])), parse(json!([["X", "", ""]])));
        assert_ne!(parse(json!(["x", "", ""])), parse(json!(["x", "o", ""])));
        assert_eq!(parse(json!(["X", "", "O"])), parse(json!(["X", "", "O"])));
    }

    #[test]
    fn null_board_differs_from_missing_board() {
        let null_board = GameRecord::from_document(json!({ "board": null })).unwrap();
        let missing = GameRecord::from_document(json!({})).unwrap();

        assert_eq!(null_board.board, Some(Board::from_value(serde_json::Value::Null)));
        assert_ne!(null_board.board, missing.board);
    }

    #[test]
    fn from_cells_writes_empty_cells_as_blank_strings() {
        let board = Board::from_cells(&[Some(Turn::X), None, Some(Turn::O)]);
        assert_eq!(board.as_value(), &json!(["X", "", "O"]));
    }

    #[test]
    fn unknown_status_is_preserved() {
        let record = GameRecord::from_document(json!({ "status": "waiting" })).unwrap();
        assert_eq!(record.status, Some(GameStatus::Other("waiting".to_string())));
        assert!(!record.is_active());
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert_matches!(
            GameRecord::from_document(json!(["X", "O"])),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            GameRecord::from_document(serde_json::Value::Null),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn empty_user_id_counts_as_unfilled() {
        let seat = Seat {
            user_id: Some(String::new()),
        };
        assert!(seat.user_id().is_none());
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let record = GameRecord {
            status: Some(GameStatus::Finished),
            current_turn: Some(Turn::X),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "status": "finished", "currentTurn": "X" }));
    }
}
