//! Directory user record and delivery addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque device token registered for push delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryAddress(String);

impl DeliveryAddress {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The part of a directory user this crate cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub fcm_tokens: Option<Vec<String>>,
}

impl UserRecord {
    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fcm_tokens: Some(tokens.into_iter().map(Into::into).collect()),
        }
    }

    /// Registered addresses as a set: blank tokens dropped, duplicates
    /// removed, first-seen order kept. Tokens are passed on exactly as
    /// stored.
    pub fn delivery_addresses(&self) -> Vec<DeliveryAddress> {
        let mut addresses: Vec<DeliveryAddress> = Vec::new();
        for token in self.fcm_tokens.iter().flatten() {
            if token.trim().is_empty() || addresses.iter().any(|a| a.as_str() == token.as_str()) {
                continue;
            }
            addresses.push(DeliveryAddress::new(token.as_str()));
        }
        addresses
    }
}
