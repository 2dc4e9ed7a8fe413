//! Create or rename a tag.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::TagRepository;
use crate::domain::tag::TAG_NAME_MAX;
use crate::domain::validation::{Rule, max_length, not_blank, not_nil};
use crate::domain::{Error, Tag, TagId, TagName};

use super::map_tag_persistence_error;

/// Save (create or rename) a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTag {
    /// Tag to rename; `None` creates a new tag.
    pub tag_id: Option<TagId>,
    /// Label.
    pub name: String,
}

/// Identity of the saved tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTagResponse {
    /// Saved tag identifier.
    pub tag_id: TagId,
}

const RULES: [Rule<SaveTag>; 3] = [
    |r| not_nil("tagId", r.tag_id.is_some_and(|id| id.is_nil())),
    |r| not_blank("name", &r.name),
    |r| max_length("name", &r.name, TAG_NAME_MAX),
];

impl Request for SaveTag {
    type Response = SaveTagResponse;
    const NAME: &'static str = "SaveTag";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`SaveTag`].
#[derive(Clone)]
pub struct SaveTagHandler {
    tags: Arc<dyn TagRepository>,
}

impl SaveTagHandler {
    /// Create a handler backed by `tags`.
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl RequestHandler<SaveTag> for SaveTagHandler {
    async fn handle(&self, request: SaveTag) -> Result<SaveTagResponse, Error> {
        let name = TagName::new(&request.name).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
        })?;
        let tag_id = request.tag_id.unwrap_or_else(TagId::random);

        let namesake = self
            .tags
            .find_by_name(&name)
            .await
            .map_err(map_tag_persistence_error)?;
        if namesake.is_some_and(|other| other.id() != tag_id) {
            return Err(Error::conflict(format!("a tag named {name} already exists"))
                .with_details(json!({ "field": "name" })));
        }

        let tag = match self
            .tags
            .find_by_id(&tag_id)
            .await
            .map_err(map_tag_persistence_error)?
        {
            Some(mut tag) => {
                tag.rename(name);
                tag
            }
            None => Tag::new(tag_id, name),
        };
        self.tags
            .save(&tag)
            .await
            .map_err(map_tag_persistence_error)?;
        info!(tag_id = %tag.id(), "tag saved");
        Ok(SaveTagResponse { tag_id: tag.id() })
    }
}
