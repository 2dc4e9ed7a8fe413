//! Delete a note and its tag associations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::events::{EventBus, EventCollector, NoteRemoved};
use crate::domain::ports::NoteRepository;
use crate::domain::{Error, NoteId};

use super::{map_note_persistence_error, note_not_found};

/// Remove a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveNote {
    /// Note to remove.
    pub note_id: NoteId,
}

impl Request for RemoveNote {
    type Response = ();
    const NAME: &'static str = "RemoveNote";
}

/// Handler for [`RemoveNote`].
#[derive(Clone)]
pub struct RemoveNoteHandler {
    notes: Arc<dyn NoteRepository>,
    bus: Arc<EventBus>,
}

impl RemoveNoteHandler {
    /// Create a handler from its collaborators.
    pub fn new(notes: Arc<dyn NoteRepository>, bus: Arc<EventBus>) -> Self {
        Self { notes, bus }
    }
}

#[async_trait]
impl RequestHandler<RemoveNote> for RemoveNoteHandler {
    async fn handle(&self, request: RemoveNote) -> Result<(), Error> {
        let mut events = EventCollector::new();
        events.raise(NoteRemoved {
            note_id: request.note_id,
        });

        let removed = self
            .notes
            .remove(&request.note_id)
            .await
            .map_err(map_note_persistence_error)?;
        if !removed {
            return Err(note_not_found(request.note_id));
        }
        info!(note_id = %request.note_id, "note removed");

        self.bus.publish(events).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::events::{DomainEvent, EventKind, MockNotificationHandler};
    use crate::domain::ports::MockNoteRepository;
    use rstest::rstest;

    fn bus_expecting(times: usize) -> Arc<EventBus> {
        let mut subscriber = MockNotificationHandler::new();
        subscriber
            .expect_handle()
            .withf(|event| matches!(event, DomainEvent::NoteRemoved(_)))
            .times(times)
            .returning(|_| Ok(()));
        Arc::new(EventBus::new().subscribe(EventKind::NoteRemoved, Arc::new(subscriber)))
    }

    #[rstest]
    #[tokio::test]
    async fn removes_and_announces() {
        let mut repo = MockNoteRepository::new();
        repo.expect_remove().times(1).returning(|_| Ok(true));
        RemoveNoteHandler::new(Arc::new(repo), bus_expecting(1))
            .handle(RemoveNote {
                note_id: NoteId::random(),
            })
            .await
            .expect("remove succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn absent_note_is_not_found_and_silent() {
        let mut repo = MockNoteRepository::new();
        repo.expect_remove().times(1).returning(|_| Ok(false));
        let error = RemoveNoteHandler::new(Arc::new(repo), bus_expecting(0))
            .handle(RemoveNote {
                note_id: NoteId::random(),
            })
            .await
            .expect_err("missing note");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
