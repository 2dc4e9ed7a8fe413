//! Driven port for access-token issuance.

use crate::domain::Username;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Issue { message: String } => "token issuance failed: {message}",
        /// The presented token is malformed, forged, or expired.
        Invalid { message: String } => "token rejected: {message}",
    }
}

/// Issues and verifies bearer tokens for an identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenProvider: Send + Sync {
    /// Issue a token for `identity`.
    fn issue(&self, identity: &Username) -> Result<String, TokenError>;

    /// Verify `token` and return the identity it was issued for.
    fn verify(&self, token: &str) -> Result<Username, TokenError>;
}
