//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState, webhook_route: &str) -> Router {
    Router::new()
        // Liveness probe, no auth
        .route("/health", get(health_check))
        // Webhook intake
        .route(webhook_route, post(api::webhook::handle))
        .with_state(state)
}

/// Simple health check - returns ok if the server is running.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Run the server with graceful shutdown support.
///
/// In-flight requests (and the cascades they carry, which complete before
/// their response is sent) drain before the process exits.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
