//! Exchange credentials for an access token.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::{PasswordHasher, TokenProvider, UserRepository};
use crate::domain::validation::{Rule, not_blank};
use crate::domain::{Error, Salt, UserId, Username};

use super::{map_hash_error, map_user_persistence_error};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Verify credentials and issue a token.
#[derive(Clone, PartialEq, Eq)]
pub struct Authenticate {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Authenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticate")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Issued token and the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateResponse {
    /// Bearer token.
    pub access_token: String,
    /// Authenticated user.
    pub user_id: UserId,
}

const RULES: [Rule<Authenticate>; 2] = [
    |r| not_blank("username", &r.username),
    |r| not_blank("password", &r.password),
];

impl Request for Authenticate {
    type Response = AuthenticateResponse;
    const NAME: &'static str = "Authenticate";

    fn rules() -> &'static [Rule<Self>] {
        &RULES
    }
}

/// Handler for [`Authenticate`].
#[derive(Clone)]
pub struct AuthenticateHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenProvider>,
}

impl AuthenticateHandler {
    /// Create a handler from its collaborators.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    fn hash_against_decoy(&self, password: &str) {
        if let Err(err) = self.hasher.hash(&Salt::generate(), password) {
            debug!(error = %err, "decoy hash failed");
        }
    }
}

#[async_trait]
impl RequestHandler<Authenticate> for AuthenticateHandler {
    async fn handle(&self, request: Authenticate) -> Result<AuthenticateResponse, Error> {
        // Unknown and malformed usernames fail the same way as a bad password,
        // including the time spent hashing.
        let Ok(username) = Username::new(&request.username) else {
            self.hash_against_decoy(&request.password);
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(user) = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_persistence_error)?
        else {
            debug!("authentication failed: unknown user");
            self.hash_against_decoy(&request.password);
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let presented = self
            .hasher
            .hash(user.salt(), &request.password)
            .map_err(map_hash_error)?;
        if presented != *user.password() {
            debug!(user_id = %user.id(), "authentication failed: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let access_token = self.tokens.issue(user.username()).map_err(|err| {
            error!(error = %err, "token issuance failed");
            Error::internal("token issuance failed")
        })?;
        info!(user_id = %user.id(), "user authenticated");
        Ok(AuthenticateResponse {
            access_token,
            user_id: user.id(),
        })
    }
}
