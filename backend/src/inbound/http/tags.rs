//! Tags API handlers.
//!
//! ```text
//! GET    /api/v1/tags
//! POST   /api/v1/tags            {"tagId":null,"name":"rust"}
//! GET    /api/v1/tags/{tagId}
//! DELETE /api/v1/tags/{tagId}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::tags::{GetTagById, GetTags, RemoveTag, SaveTag, TagView};
use crate::domain::{Error, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/tags`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTagBody {
    /// Existing tag to rename; omit to create.
    #[serde(default)]
    pub tag_id: Option<Uuid>,
    #[schema(example = "rust")]
    pub name: String,
}

/// Tag representation, also embedded in notes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagBody {
    pub tag_id: Uuid,
    pub name: String,
}

impl From<TagView> for TagBody {
    fn from(view: TagView) -> Self {
        Self {
            tag_id: *view.tag_id.as_uuid(),
            name: view.name,
        }
    }
}

/// Identity returned by `POST /api/v1/tags`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagIdBody {
    pub tag_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags ordered by name", body = [TagBody]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TagBody>>> {
    let views = state.dispatcher.send(GetTags).await?;
    Ok(web::Json(views.into_iter().map(TagBody::from).collect()))
}

/// Create or rename a tag. Names are unique.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = SaveTagBody,
    responses(
        (status = 200, description = "Saved", body = TagIdBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Name taken", body = Error)
    ),
    tags = ["tags"],
    operation_id = "saveTag"
)]
#[post("/tags")]
pub async fn save_tag(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    payload: web::Json<SaveTagBody>,
) -> ApiResult<web::Json<TagIdBody>> {
    let SaveTagBody { tag_id, name } = payload.into_inner();
    let saved = state
        .dispatcher
        .send(SaveTag {
            tag_id: tag_id.map(TagId::from_uuid),
            name,
        })
        .await?;
    Ok(web::Json(TagIdBody {
        tag_id: *saved.tag_id.as_uuid(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{tagId}",
    params(("tagId" = Uuid, Path, description = "Tag identifier")),
    responses(
        (status = 200, description = "Tag", body = TagBody),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tags"],
    operation_id = "getTag"
)]
#[get("/tags/{tag_id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<TagBody>> {
    let view = state
        .dispatcher
        .send(GetTagById {
            tag_id: TagId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete a tag and detach it from every note.
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{tagId}",
    params(("tagId" = Uuid, Path, description = "Tag identifier")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tags"],
    operation_id = "removeTag"
)]
#[delete("/tags/{tag_id}")]
pub async fn remove_tag(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .dispatcher
        .send(RemoveTag {
            tag_id: TagId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_web::test]
    async fn duplicate_names_conflict() {
        let app = actix_test::init_service(test_app()).await;
        let create = || {
            actix_test::TestRequest::post()
                .uri("/api/v1/tags")
                .insert_header(bearer())
                .set_json(json!({ "name": "rust" }))
                .to_request()
        };
        let first = actix_test::call_service(&app, create()).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = actix_test::call_service(&app, create()).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body: Value = actix_test::read_body_json(second).await;
        assert_eq!(body["code"], "conflict");
    }

    #[rstest]
    #[actix_web::test]
    async fn tags_round_trip_through_lookup() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/tags")
            .insert_header(bearer())
            .set_json(json!({ "name": "  design " }))
            .to_request();
        let saved: TagIdBody = actix_test::call_and_read_body_json(&app, request).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/tags/{}", saved.tag_id))
            .insert_header(bearer())
            .to_request();
        let tag: TagBody = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(
            tag,
            TagBody {
                tag_id: saved.tag_id,
                name: "design".into(),
            }
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/tags")
            .insert_header(bearer())
            .insert_header(("content-type", "application/json"))
            .set_payload("{")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
