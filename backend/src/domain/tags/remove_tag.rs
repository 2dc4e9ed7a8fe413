//! Delete a tag; notes referencing it lose the association.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::TagRepository;
use crate::domain::{Error, TagId};

use super::{map_tag_persistence_error, tag_not_found};

/// Remove a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveTag {
    /// Tag to remove.
    pub tag_id: TagId,
}

impl Request for RemoveTag {
    type Response = ();
    const NAME: &'static str = "RemoveTag";
}

/// Handler for [`RemoveTag`].
#[derive(Clone)]
pub struct RemoveTagHandler {
    tags: Arc<dyn TagRepository>,
}

impl RemoveTagHandler {
    /// Create a handler backed by `tags`.
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }
}

#[async_trait]
impl RequestHandler<RemoveTag> for RemoveTagHandler {
    async fn handle(&self, request: RemoveTag) -> Result<(), Error> {
        let removed = self
            .tags
            .remove(&request.tag_id)
            .await
            .map_err(map_tag_persistence_error)?;
        if !removed {
            return Err(tag_not_found(request.tag_id));
        }
        info!(tag_id = %request.tag_id, "tag removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockTagRepository;
    use rstest::rstest;

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn reports_absent_tags(#[case] existed: bool, #[case] expected: Option<ErrorCode>) {
        let mut repo = MockTagRepository::new();
        repo.expect_remove().times(1).returning(move |_| Ok(existed));
        let result = RemoveTagHandler::new(Arc::new(repo))
            .handle(RemoveTag {
                tag_id: TagId::random(),
            })
            .await;
        assert_eq!(result.err().map(|err| err.code()), expected);
    }
}
