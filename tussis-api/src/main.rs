//! tussis-api - Cough classification service
//!
//! Accepts base64-encoded audio over HTTP, runs the tussis-core inference
//! pipeline, and answers with the predicted cough type and confidence.
//! Missing model artifacts leave the service running but unready.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tussis_api::config::ServiceConfig;

/// Command-line arguments for tussis-api
#[derive(Parser, Debug)]
#[command(name = "tussis-api")]
#[command(about = "Cough classification inference service")]
#[command(version)]
struct Args {
    /// Directory holding the trained model artifacts
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tussis_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();
    let config = ServiceConfig::resolve(args.model_dir, args.port);

    info!("Starting tussis-api (cough classification) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Model directory: {}", config.model_dir.display());

    // Load artifacts and build shared state
    let state = tussis_api::init_state(&config);
    if !state.is_ready() {
        warn!("No usable model; /predict will answer 503 until artifacts are fixed");
    }

    // Build router
    let app = tussis_api::build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
