//! eplayers-web - Main entry point
//!
//! Serves the roster pages (home, login, teams) over the team and player
//! files found under the root folder.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eplayers_common::config::FileConfig;
use eplayers_web::config::Config;
use eplayers_web::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for eplayers-web
#[derive(Parser, Debug)]
#[command(name = "eplayers-web")]
#[command(about = "Team and player roster web service")]
#[command(version)]
struct Args {
    /// Port to listen on [default: 5080]
    #[arg(short, long, env = "EPLAYERS_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "EPLAYERS_HOST")]
    host: IpAddr,

    /// Root folder holding Database/ and wwwroot/ (falls back to EPLAYERS_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (defaults to <config dir>/eplayers/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "eplayers_web=debug,eplayers_common=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting E-Players roster (eplayers-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let file_config =
        FileConfig::load(args.config.as_deref()).context("Failed to load config file")?;
    let config = Config::resolve(
        args.root_folder.as_deref(),
        args.port,
        args.host,
        &file_config,
    )
    .context("Failed to resolve configuration")?;
    info!("Root folder: {}", config.root_folder.display());

    let state = AppState::open(config.layout(), config.session_idle)
        .await
        .context("Failed to open record files")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    info!("eplayers-web listening on http://{}", config.bind_addr);

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
