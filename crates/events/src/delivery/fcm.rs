//! Firebase Cloud Messaging delivery.
//!
//! [`FcmChannel`] posts one multicast request per batch to the FCM send
//! endpoint (`registration_ids` + `notification` + `data`) and maps the
//! positional `results` array back onto the requested addresses.
//! Configuration is loaded from environment variables; if
//! `FCM_SERVER_KEY` is not set, [`FcmConfig::from_env`] returns `None`.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use turn_notify_core::{DeliveryAddress, NotificationPayload};

use super::{AddressResult, PushChannel, PushError};

// ---------------------------------------------------------------------------
// FcmConfig
// ---------------------------------------------------------------------------

/// Default FCM multicast send endpoint.
///
/// This is the legacy server-key API, which Google has shut down for new
/// sends. Deployments set `FCM_ENDPOINT` to a relay that still accepts the
/// legacy request shape, or put an HTTP v1 channel behind [`PushChannel`].
pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// Default HTTP timeout for a single send.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration for the FCM push channel.
#[derive(Debug, Clone)]
pub struct FcmConfig {
    /// Server key sent as `Authorization: key=<server_key>`.
    pub server_key: String,
    /// Send endpoint URL.
    pub endpoint: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl FcmConfig {
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            endpoint: DEFAULT_FCM_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `FCM_SERVER_KEY` is not set.
    ///
    /// | Variable                   | Required | Default                               |
    /// |----------------------------|----------|---------------------------------------|
    /// | `FCM_SERVER_KEY`           | yes      | --                                    |
    /// | `FCM_ENDPOINT`             | no       | `https://fcm.googleapis.com/fcm/send` |
    /// | `FCM_REQUEST_TIMEOUT_SECS` | no       | `10`                                  |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let server_key = lookup("FCM_SERVER_KEY").filter(|k| !k.is_empty())?;
        Some(Self {
            server_key,
            endpoint: lookup("FCM_ENDPOINT")
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_FCM_ENDPOINT.to_string()),
            request_timeout: Duration::from_secs(
                lookup("FCM_REQUEST_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    registration_ids: Vec<&'a str>,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

impl<'a> FcmRequest<'a> {
    fn new(addresses: &'a [DeliveryAddress], payload: &'a NotificationPayload) -> Self {
        Self {
            registration_ids: addresses.iter().map(DeliveryAddress::as_str).collect(),
            notification: FcmNotification {
                title: &payload.title,
                body: &payload.body,
            },
            data: &payload.data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

/// Pair each requested address with its positional result.
fn map_results(
    addresses: &[DeliveryAddress],
    response: FcmResponse,
) -> Result<Vec<AddressResult>, PushError> {
    if response.results.len() != addresses.len() {
        return Err(PushError::MalformedResponse(format!(
            "expected {} results, got {}",
            addresses.len(),
            response.results.len()
        )));
    }

    Ok(addresses
        .iter()
        .cloned()
        .zip(response.results)
        .map(|(address, result)| match (result.message_id, result.error) {
            (_, Some(error)) => AddressResult::rejected(address, error),
            (Some(message_id), None) => AddressResult::delivered(address, message_id),
            (None, None) => AddressResult::rejected(address, "MissingMessageId"),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// FcmChannel
// ---------------------------------------------------------------------------

/// Sends turn notifications through FCM.
pub struct FcmChannel {
    client: reqwest::Client,
    config: FcmConfig,
}

impl FcmChannel {
    /// Create a channel with a pre-configured HTTP client.
    pub fn new(config: FcmConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PushChannel for FcmChannel {
    async fn send_batch(
        &self,
        addresses: &[DeliveryAddress],
        payload: &NotificationPayload,
    ) -> Result<Vec<AddressResult>, PushError> {
        let request = FcmRequest::new(addresses, payload);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, format!("key={}", self.config.server_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PushError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(PushError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: FcmResponse = serde_json::from_str(&body)
            .map_err(|e| PushError::MalformedResponse(e.to_string()))?;

        map_results(addresses, parsed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
