//! Look a note up by its slug.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::NoteRepository;
use crate::domain::validation::{Rule, valid_slug};
use crate::domain::{Error, Slug};

use super::{NoteView, map_note_persistence_error};

/// Fetch the single note whose slug matches exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNoteBySlug {
    /// Slug to match.
    pub slug: String,
}

const RULES: [Rule<GetNoteBySlug>; 1] = [|r| valid_slug("slug", &r.slug)];

impl Request for GetNoteBySlug {
    type Response = NoteView;
    const NAME: &'static str = "GetNoteBySlug";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`GetNoteBySlug`].
#[derive(Clone)]
pub struct GetNoteBySlugHandler {
    notes: Arc<dyn NoteRepository>,
}

impl GetNoteBySlugHandler {
    /// Create a handler backed by `notes`.
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }
}

#[async_trait]
impl RequestHandler<GetNoteBySlug> for GetNoteBySlugHandler {
    async fn handle(&self, request: GetNoteBySlug) -> Result<NoteView, Error> {
        let slug = Slug::parse(request.slug).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "slug" }))
        })?;
        let mut matches = self
            .notes
            .find_by_slug(&slug)
            .await
            .map_err(map_note_persistence_error)?;

        if matches.len() > 1 {
            error!(slug = %slug, count = matches.len(), "slug matches more than one note");
            return Err(Error::conflict("slug matches more than one note")
                .with_details(json!({ "slug": slug, "matches": matches.len() })));
        }
        matches
            .pop()
            .map(|note| NoteView::from(&note))
            .ok_or_else(|| Error::not_found(format!("no note with slug {slug}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatch::dispatch;
    use crate::domain::ports::MockNoteRepository;
    use crate::domain::{ErrorCode, Note, NoteId};
    use rstest::rstest;

    fn handler_returning(notes: Vec<Note>) -> GetNoteBySlugHandler {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug()
            .withf(|slug| slug.as_ref() == "weekly-review")
            .times(1)
            .return_once(move |_| Ok(notes));
        GetNoteBySlugHandler::new(Arc::new(repo))
    }

    fn request() -> GetNoteBySlug {
        GetNoteBySlug {
            slug: "weekly-review".into(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn returns_the_single_match() {
        let note = Note::new(NoteId::random(), "Weekly Review", "body");
        let expected = NoteView::from(&note);
        let view = handler_returning(vec![note])
            .handle(request())
            .await
            .expect("note found");
        assert_eq!(view, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn zero_matches_is_not_found() {
        let error = handler_returning(Vec::new())
            .handle(request())
            .await
            .expect_err("missing slug fails");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn several_matches_is_a_uniqueness_failure() {
        let notes = vec![
            Note::new(NoteId::random(), "Weekly Review", "a"),
            Note::new(NoteId::random(), "Weekly  Review", "b"),
        ];
        let error = handler_returning(notes)
            .handle(request())
            .await
            .expect_err("duplicate slug fails");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert_eq!(error.details().map(|d| d["matches"].clone()), Some(json!(2)));
    }

    #[rstest]
    #[case("Not A Slug")]
    #[case("")]
    #[tokio::test]
    async fn malformed_slugs_are_rejected_before_lookup(#[case] slug: &str) {
        let mut repo = MockNoteRepository::new();
        repo.expect_find_by_slug().times(0);
        let handler = GetNoteBySlugHandler::new(Arc::new(repo));
        let error = dispatch(&handler, GetNoteBySlug { slug: slug.into() })
            .await
            .expect_err("invalid slug rejected");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
