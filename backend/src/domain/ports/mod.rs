//! Driven ports at the hexagonal boundary.
//!
//! Use-case handlers depend on these traits only; adapters under
//! `crate::outbound` implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod note_repository;
mod password_hasher;
mod tag_repository;
mod token_provider;
mod transport_hub;
mod user_repository;

#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{NotePersistenceError, NoteRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagPersistenceError, TagRepository};
#[cfg(test)]
pub use token_provider::MockTokenProvider;
pub use token_provider::{TokenError, TokenProvider};
#[cfg(test)]
pub use transport_hub::MockTransportHub;
pub use transport_hub::{HubMessage, TransportHub, TransportHubError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
