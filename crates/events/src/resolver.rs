//! Recipient resolution: user id to registered delivery addresses.

use std::sync::Arc;

use turn_notify_core::DeliveryAddress;
use turn_notify_db::{DirectoryError, UserDirectory};

/// Looks up a recipient's push tokens in the user directory.
#[derive(Clone)]
pub struct RecipientResolver {
    directory: Arc<dyn UserDirectory>,
}

impl RecipientResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve the delivery addresses registered for `user_id`.
    ///
    /// A missing user and a user with no tokens both yield an empty list.
    /// Only a directory failure is returned as an error.
    pub async fn resolve(&self, user_id: &str) -> Result<Vec<DeliveryAddress>, DirectoryError> {
        let Some(user) = self.directory.get(user_id).await? else {
            tracing::info!(user_id, "Recipient not found in directory, skipping notification");
            return Ok(Vec::new());
        };

        let addresses = user.delivery_addresses();
        if addresses.is_empty() {
            tracing::info!(user_id, "Recipient has no registered push tokens");
        }

        Ok(addresses)
    }
}
