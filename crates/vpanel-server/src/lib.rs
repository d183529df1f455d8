//! vpanel HTTP server.
//!
//! Wires the repositories from `vpanel-core` into an axum application:
//! cookie-gated operator dashboard, public trial flow, and the JSON /
//! plaintext export endpoints consumed by the client app.

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;
