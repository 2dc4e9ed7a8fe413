//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the DTO and
//! error schemas, and the bearer-token security scheme. The document backs
//! Swagger UI in debug builds and is exported by the `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::notes::{NoteBody, NoteIdBody, SaveNoteBody};
use crate::inbound::http::tags::{SaveTagBody, TagBody, TagIdBody};
use crate::inbound::http::users::{
    ChangePasswordBody, CredentialsBody, RenameUserBody, TokenBody, UserBody, UserIdBody,
};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/users/token."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Notes backend API",
        description = "Notes, tags and user accounts with bearer-token authentication.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::notes::list_notes,
        crate::inbound::http::notes::save_note,
        crate::inbound::http::notes::get_note,
        crate::inbound::http::notes::get_note_by_slug,
        crate::inbound::http::notes::remove_note,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::save_tag,
        crate::inbound::http::tags::get_tag,
        crate::inbound::http::tags::remove_tag,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::issue_token,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::remove_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        NoteBody,
        NoteIdBody,
        SaveNoteBody,
        TagBody,
        TagIdBody,
        SaveTagBody,
        UserBody,
        UserIdBody,
        CredentialsBody,
        RenameUserBody,
        ChangePasswordBody,
        TokenBody,
    )),
    tags(
        (name = "notes", description = "Notes and their tag associations"),
        (name = "tags", description = "Tag management"),
        (name = "users", description = "Accounts and token issuance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
