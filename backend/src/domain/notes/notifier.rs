//! Pushes note events to connected clients through the transport hub.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::events::{
    DomainEvent, EventBus, EventKind, NotificationError, NotificationHandler,
};
use crate::domain::ports::{HubMessage, TransportHub};

/// Broadcasts `{"type": <kind>, "payload": <event>}` for every note event.
#[derive(Clone)]
pub struct NoteEventsNotifier {
    hub: Arc<dyn TransportHub>,
}

impl NoteEventsNotifier {
    /// Create a notifier that writes to `hub`.
    pub fn new(hub: Arc<dyn TransportHub>) -> Self {
        Self { hub }
    }

    /// Subscribe this notifier to every note event kind on `bus`.
    #[must_use]
    pub fn register(self, bus: EventBus) -> EventBus {
        let handler: Arc<dyn NotificationHandler> = Arc::new(self);
        bus.subscribe(EventKind::NoteSaved, Arc::clone(&handler))
            .subscribe(EventKind::NoteRemoved, handler)
    }
}

#[async_trait]
impl NotificationHandler for NoteEventsNotifier {
    async fn handle(&self, event: &DomainEvent) -> Result<(), NotificationError> {
        let kind = event.kind();
        let payload = event.payload().map_err(|err| NotificationError::Encoding {
            kind,
            message: err.to_string(),
        })?;
        self.hub
            .broadcast(HubMessage {
                kind: kind.as_str().to_owned(),
                payload,
            })
            .await
            .map_err(|err| NotificationError::Delivery {
                kind,
                message: err.to_string(),
            })
    }
}
