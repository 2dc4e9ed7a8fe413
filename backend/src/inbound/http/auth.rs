//! Bearer-token authentication for protected endpoints.
//!
//! Handlers that take an [`AuthenticatedUser`] argument reject requests
//! without a valid `Authorization: Bearer <token>` header with
//! `401 unauthorized` before their body runs.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::debug;

use crate::domain::{Error, Username};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity proven by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(Username);

impl AuthenticatedUser {
    /// Username carried by the token.
    pub fn username(&self) -> &Username {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token =
        bearer_token(req).ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    state.tokens.verify(token).map(AuthenticatedUser).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        Error::unauthorized("invalid or expired token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(actix_web::Error::from))
    }
}
