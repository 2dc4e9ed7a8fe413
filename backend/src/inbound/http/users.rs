//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users                  {"username":"ada","password":"secret"}
//! POST   /api/v1/users/token            {"username":"ada","password":"secret"}
//! GET    /api/v1/users
//! GET    /api/v1/users/{userId}
//! PUT    /api/v1/users/{userId}         {"username":"lovelace"}
//! PUT    /api/v1/users/{userId}/password {"password":"n3w","confirmPassword":"n3w"}
//! DELETE /api/v1/users/{userId}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::users::{
    Authenticate, ChangePassword, CreateUser, GetUserById, GetUsers, RemoveUser, UpdateUser,
    UserView,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Credentials for `POST /api/v1/users` and `POST /api/v1/users/token`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsBody {
    #[schema(example = "ada@example.com")]
    pub username: String,
    #[schema(example = "correct horse")]
    pub password: String,
}

/// Request body for `PUT /api/v1/users/{userId}`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameUserBody {
    pub username: String,
}

/// Request body for `PUT /api/v1/users/{userId}/password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub password: String,
    pub confirm_password: String,
}

/// Identity returned by user commands.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserIdBody {
    pub user_id: Uuid,
}

/// Public user representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub user_id: Uuid,
    pub username: String,
}

impl From<UserView> for UserBody {
    fn from(view: UserView) -> Self {
        Self {
            user_id: *view.user_id.as_uuid(),
            username: view.username,
        }
    }
}

/// Bearer token issued by `POST /api/v1/users/token`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenBody {
    pub access_token: String,
    pub user_id: Uuid,
}

fn user_id(path: web::Path<Uuid>) -> UserId {
    UserId::from_uuid(path.into_inner())
}

/// Register a new account. Does not require a token.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CredentialsBody,
    responses(
        (status = 200, description = "Created", body = UserIdBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsBody>,
) -> ApiResult<web::Json<UserIdBody>> {
    let CredentialsBody { username, password } = payload.into_inner();
    let created = state
        .dispatcher
        .send(CreateUser {
            username,
            password: Zeroizing::new(password),
        })
        .await?;
    Ok(web::Json(UserIdBody {
        user_id: *created.user_id.as_uuid(),
    }))
}

/// Exchange credentials for a bearer token.
///
/// Unknown usernames and wrong passwords are reported identically.
#[utoipa::path(
    post,
    path = "/api/v1/users/token",
    request_body = CredentialsBody,
    responses(
        (status = 200, description = "Token issued", body = TokenBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "issueToken",
    security([])
)]
#[post("/users/token")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsBody>,
) -> ApiResult<web::Json<TokenBody>> {
    let CredentialsBody { username, password } = payload.into_inner();
    let issued = state
        .dispatcher
        .send(Authenticate {
            username,
            password: Zeroizing::new(password),
        })
        .await?;
    Ok(web::Json(TokenBody {
        access_token: issued.access_token,
        user_id: *issued.user_id.as_uuid(),
    }))
}

/// List users ordered by username.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use notes_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserBody]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<UserBody>>> {
    let views = state.dispatcher.send(GetUsers).await?;
    Ok(web::Json(views.into_iter().map(UserBody::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserBody>> {
    let view = state
        .dispatcher
        .send(GetUserById {
            user_id: user_id(path),
        })
        .await?;
    Ok(web::Json(view.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}",
    params(("userId" = Uuid, Path, description = "User identifier")),
    request_body = RenameUserBody,
    responses(
        (status = 200, description = "Renamed", body = UserIdBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Username taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<RenameUserBody>,
) -> ApiResult<web::Json<UserIdBody>> {
    let updated = state
        .dispatcher
        .send(UpdateUser {
            user_id: user_id(path),
            username: payload.into_inner().username,
        })
        .await?;
    Ok(web::Json(UserIdBody {
        user_id: *updated.user_id.as_uuid(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{userId}/password",
    params(("userId" = Uuid, Path, description = "User identifier")),
    request_body = ChangePasswordBody,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[put("/users/{user_id}/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<ChangePasswordBody>,
) -> ApiResult<HttpResponse> {
    let ChangePasswordBody {
        password,
        confirm_password,
    } = payload.into_inner();
    state
        .dispatcher
        .send(ChangePassword {
            user_id: user_id(path),
            password: Zeroizing::new(password),
            confirm_password: Zeroizing::new(confirm_password),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{userId}",
    params(("userId" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "removeUser"
)]
#[delete("/users/{user_id}")]
pub async fn remove_user(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .dispatcher
        .send(RemoveUser {
            user_id: user_id(path),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
