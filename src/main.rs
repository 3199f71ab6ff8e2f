//! Focus Timer - A state-managed HTTP service driving a pomodoro focus timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    services::{BackendClient, Collaborators},
    state::AppState,
    tasks::timer_driver_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, backend={}, work={}min, short={}min, long={}min, every={}",
        config.host,
        config.port,
        config.backend_url,
        config.work,
        config.short_break,
        config.long_break,
        config.sessions_before_long_break
    );

    let timer = config.initial_timer().context("invalid timer configuration")?;
    let backend = BackendClient::new(&config.backend_url, config.token.clone(), config.request_timeout())
        .context("failed to build backend client")?;

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        timer,
        Collaborators::backend(backend),
    ));

    // Start the timer driver background task
    let driver = tokio::spawn(timer_driver_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timer                - Timer status");
    info!("  POST   /timer/start          - Start (may prompt for a task)");
    info!("  POST   /timer/select         - Confirm start with optional task");
    info!("  POST   /timer/select/cancel  - Dismiss task prompt");
    info!("  POST   /timer/pause          - Pause");
    info!("  POST   /timer/reset          - Reset current session");
    info!("  POST   /timer/mode           - Switch pomodoro/custom mode");
    info!("  PUT    /timer/config         - Update pomodoro settings");
    info!("  DELETE /timer/config         - Restore default settings");
    info!("  PUT    /timer/custom         - Set custom duration");
    info!("  GET    /notices              - Failure notices");
    info!("  GET    /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Stop ticking a timer nobody can reach anymore
    driver.abort();

    info!("Server shutdown complete");
    Ok(())
}
