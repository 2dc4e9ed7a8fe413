//! Replace a user's password.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::validation::{Rule, matches, not_blank, not_nil};
use crate::domain::{Error, UserId};

use super::{map_hash_error, map_user_persistence_error, user_not_found};

/// Set a new password. The user's salt is reused.
#[derive(Clone, PartialEq, Eq)]
pub struct ChangePassword {
    /// User whose password changes.
    pub user_id: UserId,
    /// New plaintext password.
    pub password: Zeroizing<String>,
    /// Must equal `password`.
    pub confirm_password: Zeroizing<String>,
}

impl fmt::Debug for ChangePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePassword")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

const RULES: [Rule<ChangePassword>; 3] = [
    |r| not_nil("userId", r.user_id.is_nil()),
    |r| not_blank("password", &r.password),
    |r| matches("confirmPassword", &r.confirm_password, &r.password),
];

impl Request for ChangePassword {
    type Response = ();
    const NAME: &'static str = "ChangePassword";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`ChangePassword`].
#[derive(Clone)]
pub struct ChangePasswordHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl ChangePasswordHandler {
    /// Create a handler from its collaborators.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl RequestHandler<ChangePassword> for ChangePasswordHandler {
    async fn handle(&self, request: ChangePassword) -> Result<(), Error> {
        let mut user = self
            .users
            .find_by_id(&request.user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| user_not_found(request.user_id))?;
        let hash = self
            .hasher
            .hash(user.salt(), &request.password)
            .map_err(map_hash_error)?;
        user.set_password(hash);
        self.users
            .save(&user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "password changed");
        Ok(())
    }
}
