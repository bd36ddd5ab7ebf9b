//! Focus Timer - A focus/break countdown server for dashboard widgets
//! 
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    utils::stop_timer_on_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    let timer_config = config.timer_config()?;

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, focus={}min, break={}min",
          config.host, config.port, timer_config.focus_minutes, timer_config.break_minutes);

    // Create application state; the timer stays idle until a start command
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer_config));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start  - Start (or restart) the focus countdown");
    info!("  POST /timer/pause  - Pause the countdown");
    info!("  POST /timer/resume - Resume a paused countdown");
    info!("  POST /timer/stop   - Stop and reset the timer");
    info!("  GET  /timer        - Current clock, phase and task");
    info!("  GET  /health       - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(stop_timer_on_signal(state))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
