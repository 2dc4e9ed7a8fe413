//! Argon2id implementation of the hashing capability.
//!
//! The user's salt and the plaintext feed `hash_password_into`; the 32-byte
//! output is stored hex-encoded. The same inputs always produce the same
//! hash, which is what `Authenticate` compares against.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, Salt};

const OUTPUT_LEN: usize = 32;

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Use explicit cost parameters.
    pub const fn new(params: Params) -> Self {
        Self { params }
    }

    /// Minimal cost for tests; never use in production.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hashing`] if the parameters are rejected.
    pub fn fast() -> Result<Self, PasswordHashError> {
        Params::new(Params::MIN_M_COST, 1, 1, Some(OUTPUT_LEN))
            .map(Self::new)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, salt: &Salt, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let mut output = Zeroizing::new([0_u8; OUTPUT_LEN]);
        argon2
            .hash_password_into(plaintext.as_bytes(), salt.as_bytes(), &mut *output)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(hex::encode(&*output)))
    }
}
