//! Wayfinder server
//!
//! Loads a venue walkway network once at startup and answers route
//! queries over HTTP. Each query builds its own routing graph, so requests
//! run independently on the blocking pool.

mod api;
mod config;
mod error;

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wayfinder_core::WalkwayNetwork;

use api::AppState;
use config::ServerConfig;
use error::ServerError;

#[derive(Parser, Debug)]
#[command(name = "wayfinder-server")]
#[command(version, about = "HTTP routing service for venue walkway networks", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to listen on, overrides the configuration
    #[arg(long)]
    listen: Option<SocketAddr>,
    /// Walkway GeoJSON file, overrides the configuration
    #[arg(long)]
    network: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServerConfig::load(path)?
        }
        None => {
            info!("Using default configuration");
            ServerConfig::default()
        }
    };
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(network) = args.network {
        config.network_path = Some(network);
    }

    let network = match config.network_path.as_deref() {
        Some(path) => load_network(path),
        None => {
            warn!("No walkway network configured, route requests will fail");
            WalkwayNetwork::default()
        }
    };

    let app = api::router(AppState::new(network, config.routing.clone()), &config);
    let listener = TcpListener::bind(config.listen).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Reads the walkway network, falling back to an empty one so the server
/// still starts and reports `missing_network_data`.
fn load_network(path: &Path) -> WalkwayNetwork {
    let loaded = std::fs::read_to_string(path)
        .map_err(ServerError::from)
        .and_then(|source| WalkwayNetwork::from_geojson_str(&source).map_err(ServerError::from));

    match loaded {
        Ok(network) => {
            if let Err(e) = network.validate() {
                warn!("{}: {e}", path.display());
            }
            info!(
                "Loaded {} walkway lines ({} segments) from {}",
                network.len(),
                network.segment_count(),
                path.display()
            );
            network
        }
        Err(e) => {
            warn!("Failed to load walkway network from {}: {e}", path.display());
            WalkwayNetwork::default()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
