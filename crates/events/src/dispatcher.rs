//! Best-effort batched push dispatch.
//!
//! [`Dispatcher::dispatch`] never returns an error: channel failures are
//! logged and reported as [`DispatchOutcome::Failed`] so the triggering
//! state change is never retried or rolled back because of delivery.

use std::sync::Arc;

use turn_notify_core::{DeliveryAddress, NotificationPayload};

use crate::delivery::{AddressResult, DeliveryStatus, PushChannel, PushError};

/// Result of one dispatch attempt.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// No addresses; the channel was not called.
    Skipped,
    /// The channel accepted the batch. Individual addresses may still
    /// have been rejected.
    Sent(Vec<AddressResult>),
    /// The whole batch failed at channel level.
    Failed(PushError),
}

impl DispatchOutcome {
    pub fn delivered_count(&self) -> usize {
        match self {
            Self::Sent(results) => results.iter().filter(|r| r.is_delivered()).count(),
            _ => 0,
        }
    }

    pub fn rejected_count(&self) -> usize {
        match self {
            Self::Sent(results) => results.iter().filter(|r| !r.is_delivered()).count(),
            _ => 0,
        }
    }

    /// Addresses the channel reported as permanently invalid.
    pub fn stale_addresses(&self) -> Vec<&DeliveryAddress> {
        match self {
            Self::Sent(results) => results
                .iter()
                .filter(|r| r.is_stale())
                .map(|r| &r.address)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Sends notifications through a [`PushChannel`].
#[derive(Clone)]
pub struct Dispatcher {
    channel: Arc<dyn PushChannel>,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn PushChannel>) -> Self {
        Self { channel }
    }

    /// Send `payload` to all `addresses` in a single channel call.
    pub async fn dispatch(
        &self,
        addresses: &[DeliveryAddress],
        payload: &NotificationPayload,
    ) -> DispatchOutcome {
        if addresses.is_empty() {
            tracing::info!("No delivery addresses, notification skipped");
            return DispatchOutcome::Skipped;
        }

        match self.channel.send_batch(addresses, payload).await {
            Ok(results) => {
                for result in &results {
                    if let DeliveryStatus::Rejected { reason } = &result.status {
                        tracing::warn!(
                            address = %result.address,
                            reason = %reason,
                            stale = result.is_stale(),
                            "Push address rejected"
                        );
                    }
                }

                let outcome = DispatchOutcome::Sent(results);
                tracing::info!(
                    address_count = addresses.len(),
                    delivered = outcome.delivered_count(),
                    rejected = outcome.rejected_count(),
                    "Notification sent"
                );
                outcome
            }
            Err(e) => {
                tracing::error!(
                    address_count = addresses.len(),
                    error = %e,
                    "Error sending notification"
                );
                DispatchOutcome::Failed(e)
            }
        }
    }
}
