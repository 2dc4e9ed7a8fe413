//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories for database-less runs and tests
//! - **security**: Argon2id hashing and HS256 JWT tokens
//! - **hub**: broadcast channel feeding WebSocket clients
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod hub;
pub mod memory;
pub mod persistence;
pub mod security;
