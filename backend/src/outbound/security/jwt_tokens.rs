//! HS256 JWT implementation of the token capability.
//!
//! Tokens carry the username as `sub` plus `iat` and `exp`. Issue time comes
//! from an injected [`Clock`]; expiry is checked against the wall clock by
//! `jsonwebtoken` during verification.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::Username;
use crate::domain::ports::{TokenError, TokenProvider};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signing secret and token lifetime.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl JwtConfig {
    /// Build a configuration from a shared secret and lifetime.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            ttl,
        }
    }

    /// Token lifetime.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtTokenProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenProvider {
    /// Create a provider from `config`, stamping tokens with `clock`.
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            ttl: config.ttl,
            clock,
        }
    }
}

impl TokenProvider for JwtTokenProvider {
    fn issue(&self, identity: &Username) -> Result<String, TokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Username, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        Username::new(&data.claims.sub).map_err(|err| TokenError::invalid(err.to_string()))
    }
}
