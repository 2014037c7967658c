//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers graceful shutdown of everything subscribed to
//! the [`Shutdown`] coordinator.

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Forward the first Ctrl-C to `shutdown`.
pub fn forward_ctrl_c(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, shutting down");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
        }
    })
}
