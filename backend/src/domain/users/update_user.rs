//! Rename a user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::UserRepository;
use crate::domain::user::USERNAME_MAX;
use crate::domain::validation::{Rule, max_length, not_blank, not_nil};
use crate::domain::{Error, UserId};

use super::{ensure_username_available, map_user_persistence_error, parse_username, user_not_found};

/// Change a user's login name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUser {
    /// User to update.
    pub user_id: UserId,
    /// New login name.
    pub username: String,
}

/// Identity of the updated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateUserResponse {
    /// Updated user identifier.
    pub user_id: UserId,
}

const RULES: [Rule<UpdateUser>; 3] = [
    |r| not_nil("userId", r.user_id.is_nil()),
    |r| not_blank("username", &r.username),
    |r| max_length("username", &r.username, USERNAME_MAX),
];

impl Request for UpdateUser {
    type Response = UpdateUserResponse;
    const NAME: &'static str = "UpdateUser";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`UpdateUser`].
#[derive(Clone)]
pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    /// Create a handler backed by `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<UpdateUser> for UpdateUserHandler {
    async fn handle(&self, request: UpdateUser) -> Result<UpdateUserResponse, Error> {
        let username = parse_username(&request.username)?;
        let mut user = self
            .users
            .find_by_id(&request.user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(request.user_id))?;
        ensure_username_available(self.users.as_ref(), &username, Some(user.id())).await?;

        user.rename(username);
        self.users
            .save(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "user updated");
        Ok(UpdateUserResponse { user_id: user.id() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{ErrorCode, PasswordHash, Salt, User, Username};
    use rstest::rstest;

    fn stored(id: UserId, name: &str) -> User {
        User::new(
            id,
            Username::new(name).expect("valid"),
            PasswordHash::new("hash"),
            Salt::generate(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn renames_and_keeps_credentials() {
        let id = UserId::random();
        let user = stored(id, "old");
        let hash = user.password().clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        users.expect_find_by_username().times(1).returning(|_| Ok(None));
        users
            .expect_save()
            .withf(move |user: &User| user.username().as_ref() == "new" && user.password() == &hash)
            .times(1)
            .returning(|_| Ok(()));
        let response = UpdateUserHandler::new(Arc::new(users))
            .handle(UpdateUser {
                user_id: id,
                username: "new".into(),
            })
            .await
            .expect("renamed");
        assert_eq!(response.user_id, id);
    }

    #[rstest]
    #[tokio::test]
    async fn keeping_own_name_is_not_a_conflict() {
        let id = UserId::random();
        let user = stored(id, "same");
        let holder = user.clone();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(user)));
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(holder)));
        users.expect_save().times(1).returning(|_| Ok(()));
        UpdateUserHandler::new(Arc::new(users))
            .handle(UpdateUser {
                user_id: id,
                username: "same".into(),
            })
            .await
            .expect("no conflict");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).returning(|_| Ok(None));
        users.expect_save().times(0);
        let error = UpdateUserHandler::new(Arc::new(users))
            .handle(UpdateUser {
                user_id: UserId::random(),
                username: "ada".into(),
            })
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
