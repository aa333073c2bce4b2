//! Change evaluation: does a game transition warrant a turn notification?
//!
//! [`evaluate`] is a pure, total function over two snapshots. It never
//! fails; missing data degrades to a [`Decision::Skip`].

use crate::game::{GameRecord, Seat, Turn};
use crate::types::{GameId, UserId};

/// Why a transition produced no notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither the turn nor the board changed (e.g. a metadata touch).
    NoRelevantChange,
    /// The game is finished or not yet active.
    GameNotActive,
    /// The new snapshot does not say whose turn it is.
    NoCurrentTurn,
    /// The seat for the next turn is empty or has no user id.
    SeatUnfilled,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoRelevantChange => "no_relevant_change",
            Self::GameNotActive => "game_not_active",
            Self::NoCurrentTurn => "no_current_turn",
            Self::SeatUnfilled => "seat_unfilled",
        }
    }
}

/// Outcome of evaluating one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(SkipReason),
    Notify {
        recipient_user_id: UserId,
        turn: Turn,
        game_id: GameId,
    },
}

impl Decision {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }
}

/// Decide whether the transition `before -> after` of game `game_id`
/// should notify the player whose turn it now is.
///
/// Rules, in order:
/// 1. Same turn and structurally equal board: skip.
/// 2. `after` is not active: skip.
/// 3. The seat matching `after.current_turn` is selected.
/// 4. A missing seat or user id: skip.
/// 5. Otherwise notify that user.
pub fn evaluate(before: &GameRecord, after: &GameRecord, game_id: &str) -> Decision {
    if before.current_turn == after.current_turn && before.board == after.board {
        return Decision::Skip(SkipReason::NoRelevantChange);
    }

    if !after.is_active() {
        return Decision::Skip(SkipReason::GameNotActive);
    }

    let Some(next_turn) = after.current_turn else {
        return Decision::Skip(SkipReason::NoCurrentTurn);
    };

    match after.seat(next_turn).and_then(Seat::user_id) {
        Some(user_id) => Decision::Notify {
            recipient_user_id: user_id.to_string(),
            turn: next_turn,
            game_id: game_id.to_string(),
        },
        None => Decision::Skip(SkipReason::SeatUnfilled),
    }
}
