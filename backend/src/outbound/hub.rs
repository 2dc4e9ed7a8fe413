//! `tokio::sync::broadcast` implementation of the transport hub.
//!
//! Messages are encoded to JSON once and fanned out to every subscribed
//! WebSocket session. Sending while nobody is connected is not an error.
//! Receivers that fall behind by more than the channel capacity lose the
//! oldest messages.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ports::{HubMessage, TransportHub, TransportHubError};

/// Default number of messages buffered per receiver.
pub const DEFAULT_HUB_CAPACITY: usize = 256;

/// Cloneable handle to the broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<String>,
}

impl BroadcastHub {
    /// Create a hub buffering `capacity` messages per receiver.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new client.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }

    /// Number of connected clients.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}

#[async_trait]
impl TransportHub for BroadcastHub {
    async fn broadcast(&self, message: HubMessage) -> Result<(), TransportHubError> {
        let encoded = serde_json::to_string(&message)
            .map_err(|err| TransportHubError::encoding(err.to_string()))?;
        match self.sender.send(encoded) {
            Ok(clients) => debug!(kind = %message.kind, clients, "hub message sent"),
            Err(_) => debug!(kind = %message.kind, "hub message dropped: no clients"),
        }
        Ok(())
    }
}
