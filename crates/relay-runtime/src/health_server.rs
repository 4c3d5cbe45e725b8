//! Liveness endpoint for hosting platforms that probe an HTTP port.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use tokio::{net::TcpListener, sync::watch};

use crate::shutdown::wait_for_shutdown;

pub const LIVENESS_BODY: &str = "Bot is running!";

pub fn build_health_router() -> Router {
    Router::new().route("/", get(handle_liveness))
}

async fn handle_liveness() -> (StatusCode, &'static str) {
    (StatusCode::OK, LIVENESS_BODY)
}

/// Serves the liveness router until the shutdown signal fires.
pub async fn run_health_server(bind: SocketAddr, shutdown_rx: watch::Receiver<bool>) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind liveness server on {bind}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve liveness server listen address")?;
    tracing::info!(addr = %local_addr, "liveness server listening");

    axum::serve(listener, build_health_router())
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await
        .context("liveness server exited unexpectedly")?;
    Ok(())
}
