//! Read-only tag queries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::TagRepository;
use crate::domain::{Error, TagId};

use super::{TagView, map_tag_persistence_error, tag_not_found};

/// Fetch every tag, ordered by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetTags;

impl Request for GetTags {
    type Response = Vec<TagView>;
    const NAME: &'static str = "GetTags";
}

/// Fetch one tag by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetTagById {
    /// Tag to fetch.
    pub tag_id: TagId,
}

impl Request for GetTagById {
    type Response = TagView;
    const NAME: &'static str = "GetTagById";
}

/// Handler for [`GetTags`].
#[derive(Clone)]
pub struct GetTagsHandler {
    tags: Arc<dyn TagRepository>,
}

impl GetTagsHandler {
    /// Create a handler backed by `tags`.
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl RequestHandler<GetTags> for GetTagsHandler {
    async fn handle(&self, _request: GetTags) -> Result<Vec<TagView>, Error> {
        let tags = self.tags.list().await.map_err(map_tag_persistence_error)?;
        Ok(tags.iter().map(TagView::from).collect())
    }
}

/// Handler for [`GetTagById`].
#[derive(Clone)]
pub struct GetTagByIdHandler {
    tags: Arc<dyn TagRepository>,
}

impl GetTagByIdHandler {
    /// Create a handler backed by `tags`.
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl RequestHandler<GetTagById> for GetTagByIdHandler {
    async fn handle(&self, request: GetTagById) -> Result<TagView, Error> {
        self.tags
            .find_by_id(&request.tag_id)
            .await
            .map_err(map_tag_persistence_error)?
            .map(|tag| TagView::from(&tag))
            .ok_or_else(|| tag_not_found(request.tag_id))
    }
}
