//! In-memory fakes for the directory and push channel.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use turn_notify_core::{
    Board, DeliveryAddress, GameRecord, GameStatus, NotificationPayload, Seat, Turn, UserRecord,
};
use turn_notify_db::{DirectoryError, UserDirectory};
use turn_notify_events::{AddressResult, PushChannel, PushError};

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Directory backed by a map. Records every lookup.
#[derive(Default)]
pub struct FakeDirectory {
    users: HashMap<String, UserRecord>,
    unavailable: bool,
    lookups: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: &str, user: UserRecord) -> Self {
        self.users.insert(user_id.to_string(), user);
        self
    }

    /// Every lookup fails as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, DirectoryError> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        if self.unavailable {
            return Err(DirectoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.users.get(user_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Push channel
// ---------------------------------------------------------------------------

/// How the fake channel answers a batch.
pub enum ChannelBehavior {
    /// Every address is delivered.
    DeliverAll,
    /// Listed tokens are rejected with the given reason; the rest delivered.
    Reject(Vec<(&'static str, &'static str)>),
    /// The whole call fails with HTTP status.
    Fail(u16),
}

/// Push channel that records every call.
pub struct RecordingChannel {
    behavior: ChannelBehavior,
    calls: Mutex<Vec<(Vec<DeliveryAddress>, NotificationPayload)>>,
}

impl RecordingChannel {
    pub fn new(behavior: ChannelBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<DeliveryAddress>, NotificationPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushChannel for RecordingChannel {
    async fn send_batch(
        &self,
        addresses: &[DeliveryAddress],
        payload: &NotificationPayload,
    ) -> Result<Vec<AddressResult>, PushError> {
        self.calls
            .lock()
            .unwrap()
            .push((addresses.to_vec(), payload.clone()));

        match &self.behavior {
            ChannelBehavior::DeliverAll => Ok(addresses
                .iter()
                .enumerate()
                .map(|(i, a)| AddressResult::delivered(a.clone(), format!("m-{i}")))
                .collect()),
            ChannelBehavior::Reject(rejections) => Ok(addresses
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    match rejections.iter().find(|(token, _)| *token == a.as_str()) {
                        Some((_, reason)) => AddressResult::rejected(a.clone(), *reason),
                        None => AddressResult::delivered(a.clone(), format!("m-{i}")),
                    }
                })
                .collect()),
            ChannelBehavior::Fail(status) => Err(PushError::HttpStatus(*status)),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub fn empty_board() -> Board {
    board_with(&[])
}

pub fn board_with(moves: &[(usize, Turn)]) -> Board {
    let mut cells = [None; 9];
    for (cell, mark) in moves {
        cells[*cell] = Some(*mark);
    }
    Board::from_cells(&cells)
}

pub fn game(status: GameStatus, turn: Turn, board: Board) -> GameRecord {
    GameRecord {
        status: Some(status),
        current_turn: Some(turn),
        board: Some(board),
        player_x: Some(Seat::occupied_by("u1")),
        player_o: Some(Seat::occupied_by("u2")),
    }
}
