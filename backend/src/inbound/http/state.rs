//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the dispatcher and the token capability and remain testable without
//! I/O.

use std::sync::Arc;

use crate::domain::Dispatcher;
use crate::domain::ports::TokenProvider;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Routes every request to its handler.
    pub dispatcher: Arc<Dispatcher>,
    /// Verifies bearer tokens on protected endpoints.
    pub tokens: Arc<dyn TokenProvider>,
}

impl HttpState {
    /// Construct state from its collaborators.
    pub fn new(dispatcher: Arc<Dispatcher>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { dispatcher, tokens }
    }
}
