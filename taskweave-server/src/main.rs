//! Taskweave Server
//!
//! Webhook-driven automation for derived task fields: event schedules,
//! relevance dates, date-presence statuses, and pre-meeting cascades.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{API_TOKEN_ENV, ConfigLoader, get_api_token};
use server::{build_router, run_server};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use taskweave_sdk::client::TaskClient;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Taskweave - webhook automation engine for task records
#[derive(Parser, Debug)]
#[command(name = "taskweave-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./taskweave.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting taskweave-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen);
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Resolve the task-service API token
    let api_token = get_api_token().map_err(|e| {
        tracing::error!("{} environment variable not set", API_TOKEN_ENV);
        e
    })?;

    if !loaded_config.automation.signing_enabled() {
        tracing::warn!(
            "no webhook channel secrets configured; signature verification is DISABLED"
        );
    }

    // Create the record gateway and application state
    let gateway = Arc::new(TaskClient::new(loaded_config.base_url.clone(), api_token)?);
    let state = AppState::new(loaded_config.automation, gateway);

    // Build the router
    let router = build_router(state, &loaded_config.webhook_route);

    // Run the server
    tracing::info!("Starting HTTP server on {}", loaded_config.listen);
    run_server(router, loaded_config.listen).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
