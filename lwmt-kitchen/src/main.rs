//! lwmt-kitchen - Less Waste, More Taste web service
//!
//! Serves the kitchen, recipe, saved-recipe and donation pages.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lwmt_common::config::{
    resolve_api_key, resolve_root_folder, RootFolderInitializer, TomlConfig, GOOGLE_MAPS_KEY_ENV,
    ROOT_FOLDER_ENV, SPOONACULAR_KEY_ENV,
};
use lwmt_common::db::init_database;
use lwmt_kitchen::client::ClientRegistry;
use lwmt_kitchen::directory::SqliteDirectory;
use lwmt_kitchen::places::{GooglePlacesClient, NearbySearch};
use lwmt_kitchen::recipes::SpoonacularClient;
use lwmt_kitchen::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for lwmt-kitchen
#[derive(Parser, Debug)]
#[command(name = "lwmt-kitchen")]
#[command(about = "Less Waste, More Taste kitchen service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5790", env = "LWMT_PORT")]
    port: u16,

    /// Data folder holding the database and per-browser stores
    #[arg(short, long, env = ROOT_FOLDER_ENV)]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to ~/.config/lwmt/config.toml or /etc/lwmt/config.toml)
    #[arg(short, long, env = "LWMT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = TomlConfig::load(args.config.as_deref());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any database work
    info!(
        "Starting Less Waste, More Taste (lwmt-kitchen) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Resolve root folder (CLI → ENV → TOML → default)
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to create data folder")?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    // Missing keys are warned about; the features degrade at request time
    let spoonacular_key = resolve_api_key(
        "Spoonacular",
        SPOONACULAR_KEY_ENV,
        toml_config.spoonacular_api_key.as_deref(),
    );
    let maps_key = resolve_api_key(
        "Google Maps",
        GOOGLE_MAPS_KEY_ENV,
        toml_config.google_maps_api_key.as_deref(),
    );

    let state = AppState::new(
        Arc::new(SqliteDirectory::new(pool)),
        Arc::new(SpoonacularClient::new(spoonacular_key).context("Failed to build recipe client")?),
        Arc::new(GooglePlacesClient::new(maps_key).context("Failed to build places client")?),
        ClientRegistry::new(Some(initializer.local_store_dir())),
        NearbySearch::from_config(&toml_config.places),
        toml_config.recipes.result_cap,
    );
    let sweep = state.clients.spawn_idle_sweep(
        Duration::from_secs(toml_config.clients.idle_timeout_secs),
        Duration::from_secs(toml_config.clients.sweep_interval_secs.max(1)),
    );
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("lwmt-kitchen listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweep.abort();
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
