//! Process-wide shutdown signal shared by the gateway and the liveness server.

use std::sync::Arc;

use tokio::sync::watch;

pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Resolves once shutdown is requested or every sender is gone.
pub async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    while !*shutdown_rx.borrow_and_update() {
        if shutdown_rx.changed().await.is_err() {
            return;
        }
    }
}

/// Flips the shutdown flag on the first ctrl-c.
pub async fn trigger_shutdown_on_ctrl_c(shutdown_tx: Arc<watch::Sender<bool>>) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("ctrl-c received; shutting down");
    shutdown_tx.send_replace(true);
}
