//! Driven port for the push-notification hub.
//!
//! The hub broadcasts to every connected client; there is no per-client
//! addressing and no acknowledgement.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by hub adapters.
    pub enum TransportHubError {
        /// The message could not be encoded for the wire.
        Encoding { message: String } => "hub message encoding failed: {message}",
        /// The hub is not accepting messages.
        Unavailable { message: String } => "hub unavailable: {message}",
    }
}

/// Envelope pushed to clients: `{"type": ..., "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubMessage {
    /// Event type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Event body.
    pub payload: Value,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportHub: Send + Sync {
    /// Send `message` to every connected client.
    async fn broadcast(&self, message: HubMessage) -> Result<(), TransportHubError>;
}
