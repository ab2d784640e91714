//! # DocGate Gateway
//!
//! Inbound HTTP surface: the chat endpoint plus health and debug routes.

pub mod routes;
pub mod server;

pub use server::{AppState, start};
