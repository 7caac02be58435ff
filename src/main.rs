//! Pagecrop Server
//!
//! An HTTP service that crops every page of an uploaded PDF to a fixed
//! region and returns the result for download. A background task sweeps
//! the staging and output directories for files past their retention
//! window.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagecrop_server::config::Config;
use pagecrop_server::routes;
use pagecrop_server::state::AppState;
use pagecrop_server::sweep::RetentionSweeper;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagecrop_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting Pagecrop Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Upload dir: {}", config.storage.upload_dir.display());
    tracing::info!("Output dir: {}", config.storage.output_dir.display());

    // Create application state (ensures the working directories exist)
    let app_state = AppState::new(config.clone())
        .await
        .expect("Failed to initialize application state");

    // Start the retention sweeper
    let sweeper = RetentionSweeper::new(
        vec![
            config.storage.upload_dir.clone(),
            config.storage.output_dir.clone(),
        ],
        Duration::from_secs(config.retention.max_age_hours * 3600),
        Duration::from_secs(config.retention.sweep_interval_secs),
    );
    sweeper.start();
    tracing::info!(
        max_age_hours = config.retention.max_age_hours,
        interval_secs = config.retention.sweep_interval_secs,
        "Retention sweeper started"
    );

    // Build router
    let app = routes::build_router(app_state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .expect("Invalid listen address");
    tracing::info!("Pagecrop Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
