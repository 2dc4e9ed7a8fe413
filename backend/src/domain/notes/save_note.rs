//! Create or update a note.
//!
//! Upsert keyed on the note identifier: the title and body are overwritten,
//! the slug recomputed, and the tag associations rebuilt from the requested
//! identifiers. Exactly one `NoteSaved` event is raised per successful save
//! and published only after the repository commits.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::events::{EventBus, EventCollector, NoteSaved};
use crate::domain::note::TITLE_MAX;
use crate::domain::ports::{NoteRepository, TagRepository};
use crate::domain::tags::map_tag_persistence_error;
use crate::domain::validation::{Rule, has_slug, max_length, not_blank, not_nil};
use crate::domain::{Error, Note, NoteId, Tag, TagId};

use super::map_note_persistence_error;

/// Save (create or update) a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveNote {
    /// Note to update; `None` creates a new note.
    pub note_id: Option<NoteId>,
    /// Title; the slug is derived from it.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Complete tag set for the note after the save.
    pub tag_ids: Vec<TagId>,
}

/// Identity of the saved note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveNoteResponse {
    /// Saved note identifier.
    pub note_id: NoteId,
}

const RULES: [Rule<SaveNote>; 5] = [
    |r| not_nil("noteId", r.note_id.is_some_and(|id| id.is_nil())),
    |r| not_blank("title", &r.title),
    |r| max_length("title", &r.title, TITLE_MAX),
    |r| {
        if r.title.trim().is_empty() {
            None
        } else {
            has_slug("title", &r.title)
        }
    },
    |r| not_blank("body", &r.body),
];

impl Request for SaveNote {
    type Response = SaveNoteResponse;
    const NAME: &'static str = "SaveNote";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`SaveNote`].
#[derive(Clone)]
pub struct SaveNoteHandler {
    notes: Arc<dyn NoteRepository>,
    tags: Arc<dyn TagRepository>,
    bus: Arc<EventBus>,
}

impl SaveNoteHandler {
    /// Create a handler from its collaborators.
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        tags: Arc<dyn TagRepository>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self { notes, tags, bus }
    }

    /// Load the requested tags in request order, failing when any is missing.
    async fn resolve_tags(&self, requested: &[TagId]) -> Result<Vec<Tag>, Error> {
        let mut seen = HashSet::new();
        let unique: Vec<TagId> = requested
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let mut found = self
            .tags
            .find_by_ids(&unique)
            .await
            .map_err(map_tag_persistence_error)?;

        let missing: Vec<String> = unique
            .iter()
            .filter(|id| !found.iter().any(|tag| tag.id() == **id))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(Error::not_found("one or more tags do not exist")
                .with_details(json!({ "field": "tagIds", "missing": missing })));
        }

        found.sort_by_key(|tag| unique.iter().position(|id| *id == tag.id()));
        Ok(found)
    }

    async fn ensure_slug_available(&self, note: &Note) -> Result<(), Error> {
        let owners = self
            .notes
            .find_by_slug(note.slug())
            .await
            .map_err(map_note_persistence_error)?;
        if owners.iter().any(|owner| owner.id() != note.id()) {
            return Err(Error::conflict("another note already uses this slug")
                .with_details(json!({ "field": "title", "slug": note.slug() })));
        }
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<SaveNote> for SaveNoteHandler {
    async fn handle(&self, request: SaveNote) -> Result<SaveNoteResponse, Error> {
        let SaveNote {
            note_id,
            title,
            body,
            tag_ids,
        } = request;

        let tags = self.resolve_tags(&tag_ids).await?;
        let note_id = note_id.unwrap_or_else(NoteId::random);
        let existing = self
            .notes
            .find_by_id(&note_id)
            .await
            .map_err(map_note_persistence_error)?;
        let created = existing.is_none();
        let mut note = match existing {
            Some(mut note) => {
                note.rewrite(title.trim(), body);
                note
            }
            None => Note::new(note_id, title.trim(), body),
        };
        self.ensure_slug_available(&note).await?;
        note.replace_tags(tags);

        let mut events = EventCollector::new();
        events.raise(NoteSaved { note_id: note.id() });

        self.notes
            .save(&note)
            .await
            .map_err(map_note_persistence_error)?;
        info!(note_id = %note.id(), slug = %note.slug(), created, "note saved");

        self.bus.publish(events).await;
        Ok(SaveNoteResponse { note_id: note.id() })
    }
}
