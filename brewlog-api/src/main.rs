//! Brewlog API server - Main entry point
//!
//! Single-binary HTTP backend for the Brewlog coffee journal: bean and
//! wishlist storage in SQLite, derived cost figures, enrichment lookups,
//! and backup webhook delivery.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brewlog_api::services::{BackupNotifier, EnrichmentClient};
use brewlog_api::{build_router, AppContext};

/// Command-line arguments for brewlog-api
#[derive(Parser, Debug)]
#[command(name = "brewlog-api")]
#[command(about = "HTTP backend for the Brewlog coffee journal")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5810", env = "BREWLOG_API_PORT")]
    port: u16,

    /// Root folder for the journal database
    #[arg(short, long, env = "BREWLOG_ROOT_FOLDER")]
    root_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brewlog_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Starting Brewlog API on port {}", args.port);

    let root_folder = brewlog_common::config::resolve_root_folder(
        args.root_folder.as_deref(),
        "BREWLOG_ROOT_FOLDER",
    )
    .context("Failed to resolve root folder")?;
    info!("Root folder: {}", root_folder.display());

    let db_path = brewlog_common::config::database_path(&root_folder);
    let db_pool = brewlog_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database initialized at {}", db_path.display());

    let enrichment = Arc::new(
        EnrichmentClient::new().context("Failed to create enrichment client")?,
    );
    let notifier = Arc::new(
        BackupNotifier::new().context("Failed to create backup notifier")?,
    );

    let ctx = AppContext {
        db_pool,
        enrichment,
        notifier,
    };

    let app = build_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

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
