//! Tag use cases: [`SaveTag`], [`RemoveTag`], [`GetTags`], [`GetTagById`].

mod queries;
mod remove_tag;
mod save_tag;

pub use queries::{GetTagById, GetTagByIdHandler, GetTags, GetTagsHandler};
pub use remove_tag::{RemoveTag, RemoveTagHandler};
pub use save_tag::{SaveTag, SaveTagHandler, SaveTagResponse};

use serde_json::json;
use tracing::{error, warn};

use super::ports::TagPersistenceError;
use super::{Error, Tag, TagId};

/// Read model for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagView {
    /// Tag identifier.
    pub tag_id: TagId,
    /// Tag label.
    pub name: String,
}

impl From<&Tag> for TagView {
    fn from(tag: &Tag) -> Self {
        Self {
            tag_id: tag.id(),
            name: tag.name().to_string(),
        }
    }
}

pub(crate) fn map_tag_persistence_error(error: TagPersistenceError) -> Error {
    match error {
        TagPersistenceError::Connection { message } => {
            error!(%message, "tag repository unavailable");
            Error::service_unavailable("tag store is unavailable")
        }
        TagPersistenceError::Query { message } => {
            error!(%message, "tag repository query failed");
            Error::internal(format!("tag repository error: {message}"))
        }
        TagPersistenceError::UniqueViolation { message } => {
            warn!(%message, "tag write hit a unique index");
            Error::conflict("a tag with this name already exists")
                .with_details(json!({ "field": "name" }))
        }
    }
}

fn tag_not_found(id: TagId) -> Error {
    Error::not_found(format!("tag {id} not found"))
}
