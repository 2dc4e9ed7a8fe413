//! Test helpers for inbound HTTP components.
//!
//! Handlers run against the in-memory store and a real broadcast hub so
//! request flows exercise the same dispatcher wiring as the server, minus
//! Argon2 and JWT.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};

use crate::domain::notes::NoteEventsNotifier;
use crate::domain::ports::{PasswordHashError, PasswordHasher, TokenError, TokenProvider};
use crate::domain::{Dispatcher, DispatcherPorts, EventBus, PasswordHash, Salt, Username};
use crate::outbound::hub::BroadcastHub;
use crate::outbound::memory::InMemoryStore;

use super::state::HttpState;

/// Token accepted for the `tester` identity.
pub const TEST_TOKEN: &str = "test-token";

const TEST_USERNAME: &str = "tester";
const ISSUED_PREFIX: &str = "issued:";

/// Token provider that trusts [`TEST_TOKEN`] and its own issued tokens.
#[derive(Debug, Default)]
pub struct StaticTokens;

impl TokenProvider for StaticTokens {
    fn issue(&self, identity: &Username) -> Result<String, TokenError> {
        Ok(format!("{ISSUED_PREFIX}{identity}"))
    }

    fn verify(&self, token: &str) -> Result<Username, TokenError> {
        let name = if token == TEST_TOKEN {
            TEST_USERNAME
        } else {
            token
                .strip_prefix(ISSUED_PREFIX)
                .ok_or_else(|| TokenError::invalid("unknown token"))?
        };
        Username::new(name).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

/// Reversible stand-in for Argon2: `<salt hex>:<plaintext>`.
#[derive(Debug, Default)]
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, salt: &Salt, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!(
            "{}:{plaintext}",
            hex::encode(salt.as_bytes())
        )))
    }
}

/// Build handler state over a fresh store and hub.
pub fn test_state() -> (HttpState, InMemoryStore, BroadcastHub) {
    let store = InMemoryStore::new();
    let hub = BroadcastHub::default();
    let tokens: Arc<dyn TokenProvider> = Arc::new(StaticTokens);
    let bus = Arc::new(NoteEventsNotifier::new(Arc::new(hub.clone())).register(EventBus::new()));
    let dispatcher = Dispatcher::new(DispatcherPorts {
        notes: Arc::new(store.clone()),
        tags: Arc::new(store.clone()),
        users: Arc::new(store.clone()),
        hasher: Arc::new(PlainHasher),
        tokens: Arc::clone(&tokens),
        bus,
    });
    (HttpState::new(Arc::new(dispatcher), tokens), store, hub)
}

/// Authorisation header carrying [`TEST_TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

/// Application with every API route mounted over `state`.
pub fn app_with(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(super::configure))
}

/// Application over a fresh [`test_state`].
pub fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with(test_state().0)
}
