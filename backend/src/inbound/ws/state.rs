//! Shared WebSocket adapter state.

use std::sync::Arc;

use url::{Origin, Url};

use crate::outbound::hub::BroadcastHub;

/// Dependency bundle for the `/hub` endpoint.
#[derive(Debug, Clone)]
pub struct WsState {
    /// Source of messages forwarded to every client.
    pub hub: BroadcastHub,
    allowed_origins: Arc<[Origin]>,
}

impl WsState {
    /// Accept upgrades whose `Origin` matches one of `allowed_origins`.
    pub fn new(hub: BroadcastHub, allowed_origins: impl IntoIterator<Item = Url>) -> Self {
        Self {
            hub,
            allowed_origins: allowed_origins.into_iter().map(|url| url.origin()).collect(),
        }
    }

    /// Whether `origin` is on the allow-list. Opaque origins never match.
    pub fn allows(&self, origin: &Url) -> bool {
        let origin = origin.origin();
        origin.is_tuple() && self.allowed_origins.contains(&origin)
    }
}
