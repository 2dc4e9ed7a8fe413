//! Driven port for tag persistence.

use async_trait::async_trait;

use crate::domain::{Tag, TagId, TagName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tag repository adapters.
    pub enum TagPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// A write collided with a unique index.
        UniqueViolation { message: String } => "tag repository unique constraint violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Fetch a tag by identifier.
    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagPersistenceError>;

    /// Fetch the tags among `ids` that exist, in no particular order.
    async fn find_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, TagPersistenceError>;

    /// Fetch a tag by its exact name.
    async fn find_by_name(&self, name: &TagName) -> Result<Option<Tag>, TagPersistenceError>;

    /// Fetch all tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, TagPersistenceError>;

    /// Insert or update a tag.
    async fn save(&self, tag: &Tag) -> Result<(), TagPersistenceError>;

    /// Delete a tag and every note association to it. Returns `false` when
    /// absent.
    async fn remove(&self, id: &TagId) -> Result<bool, TagPersistenceError>;
}
