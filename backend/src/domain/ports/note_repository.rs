//! Driven port for note persistence.
//!
//! A note and its tag associations form one aggregate: [`NoteRepository::save`]
//! writes both in a single unit of work, and [`NoteRepository::remove`]
//! cascades to the associations.

use async_trait::async_trait;

use crate::domain::{Note, NoteId, Slug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by note repository adapters.
    pub enum NotePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "note repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "note repository query failed: {message}",
        /// A write collided with a unique index.
        UniqueViolation { message: String } => "note repository unique constraint violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Fetch a note, with its tags, by identifier.
    async fn find_by_id(&self, id: &NoteId) -> Result<Option<Note>, NotePersistenceError>;

    /// Fetch every note whose slug equals `slug`.
    ///
    /// Slugs are expected to be unique; callers decide how to treat more
    /// than one match.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Vec<Note>, NotePersistenceError>;

    /// Fetch all notes ordered by title.
    async fn list(&self) -> Result<Vec<Note>, NotePersistenceError>;

    /// Insert or update the note and replace its tag associations.
    ///
    /// Either everything is committed or nothing is.
    async fn save(&self, note: &Note) -> Result<(), NotePersistenceError>;

    /// Delete a note and its associations. Returns `false` when absent.
    async fn remove(&self, id: &NoteId) -> Result<bool, NotePersistenceError>;
}
