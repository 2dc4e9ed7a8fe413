//! Register a user account.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::user::USERNAME_MAX;
use crate::domain::validation::{Rule, max_length, not_blank};
use crate::domain::{Error, User, UserId};

use super::{ensure_username_available, map_hash_error, map_user_persistence_error, parse_username};

/// Create a user with a freshly salted password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct CreateUser {
    /// Login name.
    pub username: String,
    /// Plaintext password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Identity of the created user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateUserResponse {
    /// New user identifier.
    pub user_id: UserId,
}

const RULES: [Rule<CreateUser>; 3] = [
    |r| not_blank("username", &r.username),
    |r| max_length("username", &r.username, USERNAME_MAX),
    |r| not_blank("password", &r.password),
];

impl Request for CreateUser {
    type Response = CreateUserResponse;
    const NAME: &'static str = "CreateUser";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`CreateUser`].
#[derive(Clone)]
pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserHandler {
    /// Create a handler from its collaborators.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl RequestHandler<CreateUser> for CreateUserHandler {
    async fn handle(&self, request: CreateUser) -> Result<CreateUserResponse, Error> {
        let username = parse_username(&request.username)?;
        ensure_username_available(self.users.as_ref(), &username, None).await?;

        let user = User::register(UserId::random(), username, |salt| {
            self.hasher.hash(salt, &request.password)
        })
        .map_err(map_hash_error)?;
        self.users
            .save(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "user created");
        Ok(CreateUserResponse { user_id: user.id() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatch::dispatch;
    use crate::domain::ports::{
        MockPasswordHasher, MockUserRepository, PasswordHashError, UserPersistenceError,
    };
    use crate::domain::{ErrorCode, PasswordHash, Salt, Username};
    use rstest::{fixture, rstest};

    fn request(username: &str, password: &str) -> CreateUser {
        CreateUser {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    #[fixture]
    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|salt, plaintext| {
                Ok(PasswordHash::new(format!("{}:{plaintext}", hex::encode(salt.as_bytes()))))
            });
        hasher
    }

    #[rstest]
    #[tokio::test]
    async fn persists_salted_hash(hasher: MockPasswordHasher) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(1).returning(|_| Ok(None));
        users
            .expect_save()
            .withf(|user: &User| {
                user.username().as_ref() == "a@b.com"
                    && user.password().as_ref()
                        == format!("{}:secret", hex::encode(user.salt().as_bytes()))
            })
            .times(1)
            .returning(|_| Ok(()));
        let handler = CreateUserHandler::new(Arc::new(users), Arc::new(hasher));
        let response = handler
            .handle(request("a@b.com", "secret"))
            .await
            .expect("user created");
        assert!(!response.user_id.is_nil());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_username_conflicts(hasher: MockPasswordHasher) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(1).returning(|_| {
            Ok(Some(User::new(
                UserId::random(),
                Username::new("a@b.com").expect("valid"),
                PasswordHash::new("x"),
                Salt::generate(),
            )))
        });
        users.expect_save().times(0);
        let handler = CreateUserHandler::new(Arc::new(users), Arc::new(hasher));
        let error = handler
            .handle(request("a@b.com", "secret"))
            .await
            .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn racing_duplicate_username_conflicts(hasher: MockPasswordHasher) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(1).returning(|_| Ok(None));
        users
            .expect_save()
            .times(1)
            .returning(|_| Err(UserPersistenceError::unique_violation("users_username_key")));
        let handler = CreateUserHandler::new(Arc::new(users), Arc::new(hasher));
        let error = handler
            .handle(request("a@b.com", "secret"))
            .await
            .expect_err("unique index wins");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert!(!error.message().contains("users_username_key"));
    }

    #[rstest]
    #[tokio::test]
    async fn hashing_failures_are_internal() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_save().times(0);
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_, _| Err(PasswordHashError::hashing("bad params")));
        let handler = CreateUserHandler::new(Arc::new(users), Arc::new(hasher));
        let error = handler
            .handle(request("ada", "secret"))
            .await
            .expect_err("hash fails");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_fields_are_rejected(hasher: MockPasswordHasher) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(0);
        let handler = CreateUserHandler::new(Arc::new(users), Arc::new(hasher));
        let error = dispatch(&handler, request(" ", ""))
            .await
            .expect_err("invalid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn debug_hides_password() {
        let rendered = format!("{:?}", request("ada", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
