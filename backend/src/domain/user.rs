//! User accounts.
//!
//! A [`User`] carries a random [`Salt`] fixed at construction. The salt feeds
//! the hashing capability together with the plaintext password; only the
//! resulting hash is stored.

use std::fmt;

use super::identifier::define_identifier;

define_identifier!(
    /// Stable user identifier.
    UserId
);

/// Length of a user's salt in bytes.
pub const SALT_LEN: usize = 16;

/// Maximum length of a username in characters.
pub const USERNAME_MAX: usize = 256;

/// Validation errors for user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeded [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Persisted salt bytes had the wrong length.
    #[error("salt must be exactly {expected} bytes, got {actual}")]
    InvalidSaltLength {
        /// Required length.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
}

/// Login name, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Random bytes mixed into a user's password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Draw a fresh salt from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Rehydrate a persisted salt.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, UserValidationError> {
        let array: [u8; SALT_LEN] =
            bytes
                .try_into()
                .map_err(|_| UserValidationError::InvalidSaltLength {
                    expected: SALT_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Raw salt bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Output of the hashing capability.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    password: PasswordHash,
    salt: Salt,
}

impl User {
    /// Register a new user. The salt must be the one `password` was hashed
    /// with; see [`User::register`].
    pub const fn new(id: UserId, username: Username, password: PasswordHash, salt: Salt) -> Self {
        Self {
            id,
            username,
            password,
            salt,
        }
    }

    /// Build a new user with a fresh salt, hashing the password with
    /// `hash`.
    pub fn register<E>(
        id: UserId,
        username: Username,
        hash: impl FnOnce(&Salt) -> Result<PasswordHash, E>,
    ) -> Result<Self, E> {
        let salt = Salt::generate();
        let password = hash(&salt)?;
        Ok(Self::new(id, username, password, salt))
    }

    /// User identifier.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Stored password hash.
    pub const fn password(&self) -> &PasswordHash {
        &self.password
    }

    /// Salt fixed at construction.
    pub const fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Change the login name.
    pub fn rename(&mut self, username: Username) {
        self.username = username;
    }

    /// Replace the stored password hash. The salt never changes.
    pub fn set_password(&mut self, password: PasswordHash) {
        self.password = password;
    }
}
