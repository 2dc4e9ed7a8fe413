//! Delete a user account.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::UserRepository;
use crate::domain::validation::{Rule, not_nil};
use crate::domain::{Error, UserId};

use super::{map_user_persistence_error, user_not_found};

/// Remove a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveUser {
    /// User to remove.
    pub user_id: UserId,
}

const RULES: [Rule<RemoveUser>; 1] = [|r| not_nil("userId", r.user_id.is_nil())];

impl Request for RemoveUser {
    type Response = ();
    const NAME: &'static str = "RemoveUser";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`RemoveUser`].
#[derive(Clone)]
pub struct RemoveUserHandler {
    users: Arc<dyn UserRepository>,
}

impl RemoveUserHandler {
    /// Create a handler backed by `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<RemoveUser> for RemoveUserHandler {
    async fn handle(&self, request: RemoveUser) -> Result<(), Error> {
        let removed = self
            .users
            .remove(&request.user_id)
            .await
            .map_err(map_user_persistence_error)?;
        if !removed {
            return Err(user_not_found(request.user_id));
        }
        info!(user_id = %request.user_id, "user removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn removes_existing_user() {
        let id = UserId::random();
        let mut users = MockUserRepository::new();
        users
            .expect_remove()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(|_| Ok(true));
        RemoveUserHandler::new(Arc::new(users))
            .handle(RemoveUser { user_id: id })
            .await
            .expect("removed");
    }

    #[rstest]
    #[tokio::test]
    async fn absent_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_remove().times(1).returning(|_| Ok(false));
        let error = RemoveUserHandler::new(Arc::new(users))
            .handle(RemoveUser {
                user_id: UserId::random(),
            })
            .await
            .expect_err("absent");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
