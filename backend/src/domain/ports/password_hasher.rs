//! Driven port for the hashing capability.

use crate::domain::{PasswordHash, Salt};

use super::define_port_error;

define_port_error! {
    /// Errors raised by hashing adapters.
    pub enum PasswordHashError {
        /// The underlying algorithm rejected its inputs or parameters.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Derives a stored hash from a salt and a plaintext password.
///
/// Implementations are CPU-bound and deterministic for a given input pair.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with `salt`.
    fn hash(&self, salt: &Salt, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;
}
