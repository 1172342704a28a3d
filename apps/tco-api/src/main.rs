//! # TCO API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  client ───► HTTP (8080) ───► routes ───► tco_core::Calculator          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tco_api::{router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting TCO API server...");

    // Load configuration
    let config = ApiConfig::load(None)?;
    info!(
        addr = %config.server.bind_address(),
        catalog = ?config.engine.catalog_path,
        hyperscale = config.engine.hyperscale_limits,
        "Configuration loaded"
    );

    // Build the engine
    let calculator = config.build_calculator()?;
    info!(
        catalog_version = %calculator.catalog().version,
        calculation_version = tco_core::CALCULATION_VERSION,
        "Calculation engine ready"
    );

    let app = router(Arc::new(AppState { calculator }));

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
