//! Notes API handlers.
//!
//! ```text
//! GET    /api/v1/notes
//! POST   /api/v1/notes                {"noteId":null,"title":"Hello","body":"...","tagIds":[]}
//! GET    /api/v1/notes/{noteId}
//! GET    /api/v1/notes/slug/{slug}
//! DELETE /api/v1/notes/{noteId}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::notes::{
    GetNoteById, GetNoteBySlug, GetNotes, NoteView, RemoveNote, SaveNote,
};
use crate::domain::{Error, NoteId, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tags::TagBody;

/// Request body for `POST /api/v1/notes`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteBody {
    /// Existing note to overwrite; omit to create.
    #[serde(default)]
    pub note_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    /// Full tag set after the save.
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl From<SaveNoteBody> for SaveNote {
    fn from(value: SaveNoteBody) -> Self {
        Self {
            note_id: value.note_id.map(NoteId::from_uuid),
            title: value.title,
            body: value.body,
            tag_ids: value.tag_ids.into_iter().map(TagId::from_uuid).collect(),
        }
    }
}

/// Identity returned by `POST /api/v1/notes`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteIdBody {
    pub note_id: Uuid,
}

/// Note representation returned by queries.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteBody {
    pub note_id: Uuid,
    pub title: String,
    pub body: String,
    #[schema(example = "hello-world")]
    pub slug: String,
    pub tags: Vec<TagBody>,
}

impl From<NoteView> for NoteBody {
    fn from(view: NoteView) -> Self {
        Self {
            note_id: *view.note_id.as_uuid(),
            title: view.title,
            body: view.body,
            slug: view.slug.as_ref().to_owned(),
            tags: view.tags.into_iter().map(TagBody::from).collect(),
        }
    }
}

/// List every note ordered by title.
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    responses(
        (status = 200, description = "Notes", body = [NoteBody]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["notes"],
    operation_id = "listNotes"
)]
#[get("/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<NoteBody>>> {
    let views = state.dispatcher.send(GetNotes).await?;
    Ok(web::Json(views.into_iter().map(NoteBody::from).collect()))
}

/// Create or update a note.
///
/// Pushes a `NoteSaved` message to `/hub` clients once the note is stored.
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    request_body = SaveNoteBody,
    responses(
        (status = 200, description = "Saved", body = NoteIdBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown tag", body = Error),
        (status = 409, description = "Slug taken", body = Error)
    ),
    tags = ["notes"],
    operation_id = "saveNote"
)]
#[post("/notes")]
pub async fn save_note(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    payload: web::Json<SaveNoteBody>,
) -> ApiResult<web::Json<NoteIdBody>> {
    let saved = state
        .dispatcher
        .send(SaveNote::from(payload.into_inner()))
        .await?;
    Ok(web::Json(NoteIdBody {
        note_id: *saved.note_id.as_uuid(),
    }))
}

/// Fetch a note by slug.
#[utoipa::path(
    get,
    path = "/api/v1/notes/slug/{slug}",
    params(("slug" = String, Path, description = "Note slug")),
    responses(
        (status = 200, description = "Note", body = NoteBody),
        (status = 400, description = "Malformed slug", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Ambiguous slug", body = Error)
    ),
    tags = ["notes"],
    operation_id = "getNoteBySlug"
)]
#[get("/notes/slug/{slug}")]
pub async fn get_note_by_slug(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<NoteBody>> {
    let view = state
        .dispatcher
        .send(GetNoteBySlug {
            slug: path.into_inner(),
        })
        .await?;
    Ok(web::Json(view.into()))
}

/// Fetch a note by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/notes/{noteId}",
    params(("noteId" = Uuid, Path, description = "Note identifier")),
    responses(
        (status = 200, description = "Note", body = NoteBody),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["notes"],
    operation_id = "getNote"
)]
#[get("/notes/{note_id}")]
pub async fn get_note(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<NoteBody>> {
    let view = state
        .dispatcher
        .send(GetNoteById {
            note_id: NoteId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(web::Json(view.into()))
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{noteId}",
    params(("noteId" = Uuid, Path, description = "Note identifier")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["notes"],
    operation_id = "removeNote"
)]
#[delete("/notes/{note_id}")]
pub async fn remove_note(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .dispatcher
        .send(RemoveNote {
            note_id: NoteId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
