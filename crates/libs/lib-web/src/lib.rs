//! # Web Library
//!
//! HTTP handlers, middleware, extractors and the server for the wallet ledger API.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
