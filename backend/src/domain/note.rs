//! Notes and their tag associations.
//!
//! A [`Note`] owns its [`NoteTag`] associations and its [`Slug`]. The slug is
//! recomputed whenever the title changes, and associations are replaced
//! wholesale rather than diffed.

use super::identifier::define_identifier;
use super::{Slug, Tag};

define_identifier!(
    /// Stable note identifier; the key for upserts.
    NoteId
);

/// Maximum length of a note title in characters.
pub const TITLE_MAX: usize = 256;

/// Join entity linking a note to a tag. Owned by the note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTag {
    note_id: NoteId,
    tag: Tag,
}

impl NoteTag {
    /// Owning note.
    pub const fn note_id(&self) -> NoteId {
        self.note_id
    }

    /// Referenced tag.
    pub const fn tag(&self) -> &Tag {
        &self.tag
    }
}

/// A titled body of text with tags.
///
/// ## Invariants
/// - `slug == Slug::from_title(title)` at all times.
/// - No two associations reference the same tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    title: String,
    body: String,
    slug: Slug,
    tags: Vec<NoteTag>,
}

impl Note {
    /// Create a note with no tags.
    pub fn new(id: NoteId, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let slug = Slug::from_title(&title);
        Self {
            id,
            title,
            body: body.into(),
            slug,
            tags: Vec::new(),
        }
    }

    /// Rehydrate a persisted note, re-deriving the slug from the title.
    pub fn restore(
        id: NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Self {
        let mut note = Self::new(id, title, body);
        note.replace_tags(tags);
        note
    }

    /// Overwrite title and body, recomputing the slug.
    pub fn rewrite(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.title = title.into();
        self.slug = Slug::from_title(&self.title);
        self.body = body.into();
    }

    /// Clear every association and rebuild it from `tags`.
    ///
    /// Later duplicates of a tag are ignored.
    pub fn replace_tags(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.tags.clear();
        for tag in tags {
            if self.tags.iter().any(|existing| existing.tag.id() == tag.id()) {
                continue;
            }
            self.tags.push(NoteTag {
                note_id: self.id,
                tag,
            });
        }
    }

    /// Drop the association to a removed tag, if present.
    pub fn detach_tag(&mut self, tag_id: super::TagId) {
        self.tags.retain(|note_tag| note_tag.tag.id() != tag_id);
    }

    /// Note identifier.
    pub const fn id(&self) -> NoteId {
        self.id
    }

    /// Title as submitted.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Body as submitted.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Slug derived from the title.
    pub const fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Current tag associations, in submission order.
    pub fn note_tags(&self) -> &[NoteTag] {
        &self.tags
    }

    /// Tags referenced by this note, in submission order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().map(NoteTag::tag)
    }
}
