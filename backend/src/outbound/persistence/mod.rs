//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows (`models.rs`) and domain
//! aggregates; no business rules live here. Connections come from a shared
//! `bb8` pool through `diesel-async`, and every Diesel or pool failure is
//! mapped to the owning port's `Connection` or `Query` variant.
//!
//! # Example
//!
//! ```ignore
//! use notes_backend::outbound::persistence::{DbPool, DieselNoteRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/notes")).await?;
//! let notes = DieselNoteRepository::new(pool.clone());
//! ```

mod diesel_basic_error_mapping;
mod diesel_note_repository;
mod diesel_tag_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_note_repository::DieselNoteRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
