//! Domain types and pure decision logic for turn notifications.
//!
//! Nothing in this crate performs I/O. Game records and user records are
//! loaded by the caller and passed in; [`evaluator::evaluate`] decides
//! whether a transition is worth a push notification and for whom.

pub mod error;
pub mod evaluator;
pub mod game;
pub mod notification;
pub mod types;
pub mod user;

pub use error::CoreError;
pub use evaluator::{evaluate, Decision, SkipReason};
pub use game::{Board, GameRecord, GameStatus, Seat, Turn};
pub use notification::NotificationPayload;
pub use user::{DeliveryAddress, UserRecord};
