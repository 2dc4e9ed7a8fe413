//! Read-only note queries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::NoteRepository;
use crate::domain::{Error, NoteId};

use super::{NoteView, map_note_persistence_error, note_not_found};

/// Fetch one note by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetNoteById {
    /// Note to fetch.
    pub note_id: NoteId,
}

impl Request for GetNoteById {
    type Response = NoteView;
    const NAME: &'static str = "GetNoteById";
}

/// Fetch every note, ordered by title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetNotes;

impl Request for GetNotes {
    type Response = Vec<NoteView>;
    const NAME: &'static str = "GetNotes";
}

/// Handler for [`GetNoteById`].
#[derive(Clone)]
pub struct GetNoteByIdHandler {
    notes: Arc<dyn NoteRepository>,
}

impl GetNoteByIdHandler {
    /// Create a handler backed by `notes`.
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }
}

#[async_trait]
impl RequestHandler<GetNoteById> for GetNoteByIdHandler {
    async fn handle(&self, request: GetNoteById) -> Result<NoteView, Error> {
        self.notes
            .find_by_id(&request.note_id)
            .await
            .map_err(map_note_persistence_error)?
            .map(|note| NoteView::from(&note))
            .ok_or_else(|| note_not_found(request.note_id))
    }
}

/// Handler for [`GetNotes`].
#[derive(Clone)]
pub struct GetNotesHandler {
    notes: Arc<dyn NoteRepository>,
}

impl GetNotesHandler {
    /// Create a handler backed by `notes`.
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }
}

#[async_trait]
impl RequestHandler<GetNotes> for GetNotesHandler {
    async fn handle(&self, _request: GetNotes) -> Result<Vec<NoteView>, Error> {
        let notes = self
            .notes
            .list()
            .await
            .map_err(map_note_persistence_error)?;
        Ok(notes.iter().map(NoteView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::Note;
    use crate::domain::ports::{MockNoteRepository, NotePersistenceError};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn get_by_id_maps_missing_note_to_not_found() {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        let error = GetNoteByIdHandler::new(Arc::new(repo))
            .handle(GetNoteById {
                note_id: NoteId::random(),
            })
            .await
            .expect_err("missing note");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn get_by_id_returns_view() {
        let note = Note::new(NoteId::random(), "Groceries", "milk");
        let note_id = note.id();
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_id()
            .withf(move |id| *id == note_id)
            .times(1)
            .return_once(move |_| Ok(Some(note)));
        let view = GetNoteByIdHandler::new(Arc::new(repo))
            .handle(GetNoteById { note_id })
            .await
            .expect("note found");
        assert_eq!(view.slug.as_ref(), "groceries");
    }

    #[rstest]
    #[tokio::test]
    async fn list_projects_every_note() {
        let mut repo = MockNoteRepository::new();
        repo.expect_list().times(1).returning(|| {
            Ok(vec![
                Note::new(NoteId::random(), "A", "1"),
                Note::new(NoteId::random(), "B", "2"),
            ])
        });
        let views = GetNotesHandler::new(Arc::new(repo))
            .handle(GetNotes)
            .await
            .expect("list succeeds");
        let titles: Vec<_> = views.iter().map(|view| view.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_propagates_persistence_failures() {
        let mut repo = MockNoteRepository::new();
        repo.expect_list()
            .times(1)
            .returning(|| Err(NotePersistenceError::query("boom")));
        let error = GetNotesHandler::new(Arc::new(repo))
            .handle(GetNotes)
            .await
            .expect_err("failure propagates");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
