//! Tickbook Gateway HTTP API Server
//!
//! Exposes the invoice-processing endpoint and a health check.

pub mod cors;
pub mod process_api;
pub mod server;

pub use server::{router, start_server, AppState};
