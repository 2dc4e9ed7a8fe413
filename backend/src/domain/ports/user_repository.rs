//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A write collided with a unique index.
        UniqueViolation { message: String } => "user repository unique constraint violated: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch all users ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Insert or update a user record.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Delete a user. Returns `false` when absent.
    async fn remove(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
