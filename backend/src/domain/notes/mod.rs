//! Note use cases.
//!
//! Commands: [`SaveNote`], [`RemoveNote`]. Queries: [`GetNoteBySlug`],
//! [`GetNoteById`], [`GetNotes`]. Each request has exactly one handler in
//! this module; [`NoteEventsNotifier`] forwards the resulting events to the
//! transport hub.

mod get_note_by_slug;
mod notifier;
mod queries;
mod remove_note;
mod save_note;

pub use get_note_by_slug::{GetNoteBySlug, GetNoteBySlugHandler};
pub use notifier::NoteEventsNotifier;
pub use queries::{GetNoteById, GetNoteByIdHandler, GetNotes, GetNotesHandler};
pub use remove_note::{RemoveNote, RemoveNoteHandler};
pub use save_note::{SaveNote, SaveNoteHandler, SaveNoteResponse};

use serde_json::json;
use tracing::{error, warn};

use super::ports::NotePersistenceError;
use super::tags::TagView;
use super::{Error, Note, NoteId, Slug};

/// Read model returned by note queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    /// Note identifier.
    pub note_id: NoteId,
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
    /// Slug derived from the title.
    pub slug: Slug,
    /// Associated tags, in submission order.
    pub tags: Vec<TagView>,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            note_id: note.id(),
            title: note.title().to_owned(),
            body: note.body().to_owned(),
            slug: note.slug().clone(),
            tags: note.tags().map(TagView::from).collect(),
        }
    }
}

pub(crate) fn map_note_persistence_error(error: NotePersistenceError) -> Error {
    match error {
        NotePersistenceError::Connection { message } => {
            error!(%message, "note repository unavailable");
            Error::service_unavailable("note store is unavailable")
        }
        NotePersistenceError::Query { message } => {
            error!(%message, "note repository query failed");
            Error::internal(format!("note repository error: {message}"))
        }
        NotePersistenceError::UniqueViolation { message } => {
            warn!(%message, "note write hit a unique index");
            Error::conflict("another note already uses this slug")
                .with_details(json!({ "field": "title" }))
        }
    }
}

fn note_not_found(id: NoteId) -> Error {
    Error::not_found(format!("note {id} not found"))
}
