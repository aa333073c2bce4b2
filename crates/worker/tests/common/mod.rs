//! Fakes and fixtures shared by the worker integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use turn_notify_core::{DeliveryAddress, NotificationPayload, UserRecord};
use turn_notify_db::{DirectoryError, PgUserDirectory, UserDirectory};
use turn_notify_events::{AddressResult, PushChannel, PushError, TurnNotifier};
use turn_notify_worker::poller::TaskPoller;

/// Push channel that records batches and either delivers or fails them.
#[derive(Default)]
pub struct StubChannel {
    fail_with: Option<u16>,
    calls: Mutex<Vec<(Vec<DeliveryAddress>, NotificationPayload)>>,
}

impl StubChannel {
    pub fn delivering() -> Self {
        Self::default()
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(Vec<DeliveryAddress>, NotificationPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushChannel for StubChannel {
    async fn send_batch(
        &self,
        addresses: &[DeliveryAddress],
        payload: &NotificationPayload,
    ) -> Result<Vec<AddressResult>, PushError> {
        self.calls
            .lock()
            .unwrap()
            .push((addresses.to_vec(), payload.clone()));
        if let Some(status) = self.fail_with {
            return Err(PushError::HttpStatus(status));
        }
        Ok(addresses
            .iter()
            .enumerate()
            .map(|(i, a)| AddressResult::delivered(a.clone(), format!("msg-{i}")))
            .collect())
    }
}

/// Directory whose every lookup fails.
pub struct DownDirectory;

#[async_trait]
impl UserDirectory for DownDirectory {
    async fn get(&self, _user_id: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Err(DirectoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// Poller over the real `users` table and the given channel.
pub fn build_poller(pool: &PgPool, channel: Arc<StubChannel>) -> TaskPoller {
    let directory = Arc::new(PgUserDirectory::new(pool.clone()));
    poller_with(pool, directory, channel)
}

pub fn poller_with(
    pool: &PgPool,
    directory: Arc<dyn UserDirectory>,
    channel: Arc<StubChannel>,
) -> TaskPoller {
    TaskPoller::new(
        pool.clone(),
        TurnNotifier::new(directory, channel),
        Duration::from_millis(10),
        Duration::from_secs(300),
    )
}

/// Game document with u1 seated as X and u2 as O.
pub fn game_state(status: &str, turn: &str, board: serde_json::Value) -> serde_json::Value {
    json!({
        "status": status,
        "currentTurn": turn,
        "board": board,
        "playerX": { "userId": "u1" },
        "playerO": { "userId": "u2" },
        "lastUpdated": "2024-06-01T12:00:00Z"
    })
}

pub fn empty_board() -> serde_json::Value {
    json!([null, null, null, null, null, null, null, null, null])
}

pub fn centre_taken_by_x() -> serde_json::Value {
    json!([null, null, null, null, "X", null, null, null, null])
}
