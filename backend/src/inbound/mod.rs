//! Inbound adapters that translate external requests into dispatcher calls
//! while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the `/hub` push channel lives under
//! [`ws`].

pub mod http;
pub mod ws;
