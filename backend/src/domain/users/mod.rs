//! User account use cases.
//!
//! Commands: [`CreateUser`], [`UpdateUser`], [`RemoveUser`],
//! [`ChangePassword`], [`Authenticate`]. Queries: [`GetUserById`],
//! [`GetUsers`]. Hashing and token issuance are injected capabilities; the
//! handlers never see an algorithm.

mod authenticate;
mod change_password;
mod create_user;
mod queries;
mod remove_user;
mod update_user;

pub use authenticate::{Authenticate, AuthenticateHandler, AuthenticateResponse};
pub use change_password::{ChangePassword, ChangePasswordHandler};
pub use create_user::{CreateUser, CreateUserHandler, CreateUserResponse};
pub use queries::{GetUserById, GetUserByIdHandler, GetUsers, GetUsersHandler};
pub use remove_user::{RemoveUser, RemoveUserHandler};
pub use update_user::{UpdateUser, UpdateUserHandler, UpdateUserResponse};

use serde_json::json;
use tracing::{error, warn};

use super::ports::{PasswordHashError, UserPersistenceError, UserRepository};
use super::{Error, User, UserId, Username};

/// Read model for a user. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    /// User identifier.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id(),
            username: user.username().to_string(),
        }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::service_unavailable("user store is unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::UniqueViolation { message } => {
            warn!(%message, "user write hit a unique index");
            Error::conflict("username is already taken")
                .with_details(json!({ "field": "username" }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("password hashing failed")
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

fn parse_username(value: &str) -> Result<Username, Error> {
    Username::new(value).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "username" }))
    })
}

/// Reject `username` when a user other than `owner` already holds it.
async fn ensure_username_available(
    users: &dyn UserRepository,
    username: &Username,
    owner: Option<UserId>,
) -> Result<(), Error> {
    let holder = users
        .find_by_username(username)
        .await
        .map_err(map_user_persistence_error)?;
    match holder {
        Some(other) if Some(other.id()) != owner => Err(Error::conflict(format!(
            "username {username} is already taken"
        ))
        .with_details(json!({ "field": "username" }))),
        _ => Ok(()),
    }
}
