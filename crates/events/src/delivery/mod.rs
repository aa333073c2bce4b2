//! Push delivery channels.
//!
//! [`PushChannel`] is the seam between the dispatcher and the transport.
//! [`fcm::FcmChannel`] is the production implementation.

use async_trait::async_trait;
use turn_notify_core::{DeliveryAddress, NotificationPayload};

pub mod fcm;

/// Rejection reasons that mean the token will never work again.
const STALE_TOKEN_REASONS: &[&str] = &["NotRegistered", "InvalidRegistration"];

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Whole-batch failure of a push channel.
///
/// Per-address rejections are not errors; they are reported in
/// [`AddressResult`].
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The HTTP request failed (network, DNS, timeout, etc.).
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The channel rejected our credentials.
    #[error("Push channel rejected credentials (HTTP {0})")]
    Unauthorized(u16),

    /// The channel returned some other non-2xx status.
    #[error("Push channel returned HTTP {0}")]
    HttpStatus(u16),

    /// The response could not be matched to the request.
    #[error("Malformed push response: {0}")]
    MalformedResponse(String),
}

// ---------------------------------------------------------------------------
// Per-address results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered { message_id: String },
    Rejected { reason: String },
}

/// Outcome for one address in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressResult {
    pub address: DeliveryAddress,
    pub status: DeliveryStatus,
}

impl AddressResult {
    pub fn delivered(address: DeliveryAddress, message_id: impl Into<String>) -> Self {
        Self {
            address,
            status: DeliveryStatus::Delivered {
                message_id: message_id.into(),
            },
        }
    }

    pub fn rejected(address: DeliveryAddress, reason: impl Into<String>) -> Self {
        Self {
            address,
            status: DeliveryStatus::Rejected {
                reason: reason.into(),
            },
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered { .. })
    }

    /// Whether the channel says this token is permanently unusable.
    pub fn is_stale(&self) -> bool {
        match &self.status {
            DeliveryStatus::Rejected { reason } => STALE_TOKEN_REASONS.contains(&reason.as_str()),
            DeliveryStatus::Delivered { .. } => false,
        }
    }
}

// ---------------------------------------------------------------------------
// PushChannel
// ---------------------------------------------------------------------------

/// External push transport.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Send `payload` to every address in one outbound call.
    ///
    /// On success returns one [`AddressResult`] per address, in input
    /// order. Fails as a whole only on channel-level faults.
    async fn send_batch(
        &self,
        addresses: &[DeliveryAddress],
        payload: &NotificationPayload,
    ) -> Result<Vec<AddressResult>, PushError>;
}
