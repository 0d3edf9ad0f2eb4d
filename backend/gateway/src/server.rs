//! Gateway HTTP server and router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{any, get};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use tickbook_core::ExtractionProvider;

use crate::cors;
use crate::process_api;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key was configured at startup; requests then
    /// fail per call instead of crashing the process.
    pub provider: Option<Arc<dyn ExtractionProvider>>,
}

/// Build the router. The invoice handler owns method dispatch, so it is
/// registered for every method.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(process_api::process_invoice))
        .route("/api/process-invoice", any(process_api::process_invoice))
        .route("/api/health", get(health))
        .layer(middleware::from_fn(cors::apply_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the Axum HTTP server for the gateway.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tickbook",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
