//! whyhere-rank - Ranking service entry point
//!
//! Serves ranked, explained street results to the WhyHere UI. Entities come
//! from the `/data/pois` backend or the built-in Atlanta streets.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use whyhere_common::config::{DataSource, TomlConfig};
use whyhere_common::priority::PriorityList;
use whyhere_rank::logging::init_tracing;
use whyhere_rank::services::{EntitySource, RankingSession};
use whyhere_rank::{build_router, AppState};

/// Command-line arguments for whyhere-rank
#[derive(Parser, Debug)]
#[command(name = "whyhere-rank")]
#[command(about = "Fit-score ranking service for WhyHere")]
#[command(version)]
struct Args {
    /// Path to whyhere.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "WHYHERE_PORT")]
    port: Option<u16>,

    /// Entity source: mock or backend (overrides config)
    #[arg(long)]
    data_source: Option<DataSource>,

    /// Initial priority order, comma-separated wire names
    #[arg(long)]
    priorities: Option<PriorityList>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(source) = args.data_source {
        config.data_source = source;
    }

    init_tracing(&config.logging, "whyhere_rank")?;

    info!("Starting WhyHere ranking service (whyhere-rank) v{}", env!("CARGO_PKG_VERSION"));
    info!(
        port = config.port,
        data_source = %config.data_source,
        backend_url = %config.backend_url,
        timeout_secs = config.request_timeout_secs,
        "Configuration resolved"
    );

    let source = EntitySource::from_config(&config).context("Failed to create backend client")?;
    let priorities = args.priorities.unwrap_or_default();
    let state = AppState::new(RankingSession::new(source, priorities, config.profile.clone()));

    // Initial ranking runs in the background so the server answers immediately
    let session = state.session.clone();
    tokio::spawn(async move {
        if let Err(e) = session.refresh().await {
            warn!("Initial refresh failed: {}", e);
        }
    });

    let app = build_router(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("whyhere-rank listening on http://{}", addr);
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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
