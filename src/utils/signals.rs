//! Signal handling for graceful shutdown

use std::{io, sync::Arc};
use futures::stream::StreamExt;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{error, info};

use crate::state::AppState;

/// Wait for a shutdown signal (SIGTERM, SIGINT, SIGHUP) and return it
pub async fn shutdown_signal() -> io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP])?;
    let handle = signals.handle();

    let received = signals.next().await;
    handle.close();

    match received {
        Some(signal) => {
            info!("Received signal: {}", signal);
            Ok(signal)
        }
        None => Err(io::Error::other("signal stream closed")),
    }
}

/// Wait for a shutdown signal, then stop the timer so no ticks outlive the server.
///
/// If signal handlers cannot be registered the error is logged and this
/// never resolves, so the server keeps running instead of exiting at startup.
pub async fn stop_timer_on_signal(state: Arc<AppState>) {
    if let Err(e) = shutdown_signal().await {
        error!("Failed to listen for shutdown signals: {}", e);
        // Keep serving; without signal handling the process can only be killed
        std::future::pending::<()>().await;
    }

    if let Err(e) = state.shutdown() {
        error!("Failed to stop timer during shutdown: {}", e);
    }
}
