//! Domain events and the in-process event bus.
//!
//! Handlers stage events on an explicit [`EventCollector`] while they mutate
//! entities. Once the persistence commit succeeds they hand the collector to
//! [`EventBus::publish`], which delivers each event, in insertion order, to
//! every [`NotificationHandler`] subscribed to the event's kind.
//!
//! Delivery happens after the commit, so a failing subscriber cannot undo the
//! change that raised the event. Failures are logged and counted, never
//! retried and never returned to the command's caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::NoteId;

/// Raised when a note has been created or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSaved {
    /// Identity of the saved note.
    pub note_id: NoteId,
}

/// Raised when a note has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRemoved {
    /// Identity of the removed note.
    pub note_id: NoteId,
}

/// Immutable fact about a committed state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// See [`NoteSaved`].
    NoteSaved(NoteSaved),
    /// See [`NoteRemoved`].
    NoteRemoved(NoteRemoved),
}

/// Concrete event type used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`NoteSaved`] events.
    NoteSaved,
    /// [`NoteRemoved`] events.
    NoteRemoved,
}

impl EventKind {
    /// Wire name of the kind, used as the hub message type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoteSaved => "NoteSaved",
            Self::NoteRemoved => "NoteRemoved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainEvent {
    /// Subscription key for this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::NoteSaved(_) => EventKind::NoteSaved,
            Self::NoteRemoved(_) => EventKind::NoteRemoved,
        }
    }

    /// JSON payload describing the event.
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::NoteSaved(event) => serde_json::to_value(event),
            Self::NoteRemoved(event) => serde_json::to_value(event),
        }
    }
}

impl From<NoteSaved> for DomainEvent {
    fn from(value: NoteSaved) -> Self {
        Self::NoteSaved(value)
    }
}

impl From<NoteRemoved> for DomainEvent {
    fn from(value: NoteRemoved) -> Self {
        Self::NoteRemoved(value)
    }
}

/// Pending events for one unit of work.
///
/// Passed explicitly through a handler instead of living on the entities.
#[derive(Debug, Default)]
pub struct EventCollector {
    pending: Vec<DomainEvent>,
}

impl EventCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for delivery after commit.
    pub fn raise(&mut self, event: impl Into<DomainEvent>) {
        self.pending.push(event.into());
    }

    /// Events queued so far, in insertion order.
    #[must_use]
    pub fn pending(&self) -> &[DomainEvent] {
        &self.pending
    }

    /// Whether nothing has been raised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Failure reported by a subscriber while delivering an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// The event could not be encoded.
    #[error("failed to encode {kind} event: {message}")]
    Encoding {
        /// Event kind.
        kind: EventKind,
        /// Encoder message.
        message: String,
    },
    /// The downstream sink rejected the event.
    #[error("failed to deliver {kind} event: {message}")]
    Delivery {
        /// Event kind.
        kind: EventKind,
        /// Sink message.
        message: String,
    },
}

/// Subscriber reacting to flushed events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationHandler: Send + Sync {
    /// React to one event.
    async fn handle(&self, event: &DomainEvent) -> Result<(), NotificationError>;
}

/// Outcome of publishing a collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscriber invocations that succeeded.
    pub delivered: usize,
    /// Subscriber invocations that failed and were logged.
    pub failed: usize,
}

/// In-process fan-out from event kinds to subscribers.
#[derive(Default, Clone)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<Arc<dyn NotificationHandler>>>,
}

impl EventBus {
    /// Create a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    #[must_use]
    pub fn subscribe(mut self, kind: EventKind, handler: Arc<dyn NotificationHandler>) -> Self {
        self.subscribers.entry(kind).or_default().push(handler);
        self
    }

    /// Number of subscribers registered for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver every queued event to its subscribers.
    ///
    /// Call only after the unit of work that raised the events committed.
    pub async fn publish(&self, events: EventCollector) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for event in events.pending {
            let kind = event.kind();
            let Some(handlers) = self.subscribers.get(&kind) else {
                debug!(event = %kind, "no subscribers for event");
                continue;
            };
            for handler in handlers {
                match handler.handle(&event).await {
                    Ok(()) => report.delivered += 1,
                    Err(error) => {
                        warn!(event = %kind, error = %error, "notification delivery failed");
                        report.failed += 1;
                    }
                }
            }
        }
        report
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self
            .subscribers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        kinds.sort_unstable();
        f.debug_struct("EventBus").field("subscribers", &kinds).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use uuid::Uuid;

    #[fixture]
    fn note_id() -> NoteId {
        NoteId::from_uuid(Uuid::nil())
    }

    #[rstest]
    fn payload_is_camel_case(note_id: NoteId) {
        let event = DomainEvent::from(NoteSaved { note_id });
        assert_eq!(
            event.payload().expect("encodes"),
            json!({ "noteId": "00000000-0000-0000-0000-000000000000" })
        );
        assert_eq!(event.kind().as_str(), "NoteSaved");
    }

    #[rstest]
    #[tokio::test]
    async fn delivers_in_insertion_order_to_matching_subscribers(note_id: NoteId) {
        let mut seq = Sequence::new();
        let mut handler = MockNotificationHandler::new();
        handler
            .expect_handle()
            .withf(|event| event.kind() == EventKind::NoteSaved)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        handler
            .expect_handle()
            .withf(|event| event.kind() == EventKind::NoteRemoved)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let handler: Arc<dyn NotificationHandler> = Arc::new(handler);
        let bus = EventBus::new()
            .subscribe(EventKind::NoteSaved, handler.clone())
            .subscribe(EventKind::NoteRemoved, handler);

        let mut events = EventCollector::new();
        events.raise(NoteSaved { note_id });
        events.raise(NoteRemoved { note_id });

        let report = bus.publish(events).await;
        assert_eq!(report, DeliveryReport { delivered: 2, failed: 0 });
    }

    #[rstest]
    #[tokio::test]
    async fn skips_kinds_without_subscribers(note_id: NoteId) {
        let mut handler = MockNotificationHandler::new();
        handler.expect_handle().times(0);
        let bus = EventBus::new().subscribe(EventKind::NoteRemoved, Arc::new(handler));

        let mut events = EventCollector::new();
        events.raise(NoteSaved { note_id });

        assert_eq!(bus.publish(events).await, DeliveryReport::default());
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_counted_and_do_not_stop_delivery(note_id: NoteId) {
        let mut failing = MockNotificationHandler::new();
        failing.expect_handle().times(1).returning(|event| {
            Err(NotificationError::Delivery {
                kind: event.kind(),
                message: "hub offline".into(),
            })
        });
        let mut healthy = MockNotificationHandler::new();
        healthy.expect_handle().times(1).returning(|_| Ok(()));
        let bus = EventBus::new()
            .subscribe(EventKind::NoteSaved, Arc::new(failing))
            .subscribe(EventKind::NoteSaved, Arc::new(healthy));

        let mut events = EventCollector::new();
        events.raise(NoteSaved { note_id });

        let report = bus.publish(events).await;
        assert_eq!(report, DeliveryReport { delivered: 1, failed: 1 });
    }

    #[rstest]
    fn subscriber_count_tracks_registrations() {
        let bus = EventBus::new().subscribe(
            EventKind::NoteSaved,
            Arc::new(MockNotificationHandler::new()),
        );
        assert_eq!(bus.subscriber_count(EventKind::NoteSaved), 1);
        assert_eq!(bus.subscriber_count(EventKind::NoteRemoved), 0);
    }
}
