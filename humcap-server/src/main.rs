//! humcap-server - hum captcha HTTP service
//!
//! Startup order: parse CLI, load and validate the bootstrap config, install
//! tracing, then bind and serve until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use humcap_common::config::{self, resolve_config_path};
use humcap_server::{build_router, logging, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

/// Command-line arguments for humcap-server
#[derive(Parser, Debug)]
#[command(name = "humcap-server")]
#[command(about = "Hum-along captcha verification service")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = config::CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Listen address (overrides config file)
    #[arg(long, env = "HUMCAP_HOST")]
    host: Option<String>,

    /// HTTP server port (overrides config file)
    #[arg(short, long, env = "HUMCAP_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = config::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate().context("Invalid configuration")?;

    logging::init_tracing(&config.logging)?;

    info!(
        "Starting humcap-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match resolve_config_path(args.config.as_deref()) {
        Some((path, _)) if path.exists() => {
            info!("Configuration loaded from {}", path.display());
        }
        Some((path, _)) => {
            warn!(
                "No config file at {}, using compiled defaults",
                path.display()
            );
        }
        None => warn!("No config directory available, using compiled defaults"),
    }

    let bind_addr = config.bind_addr();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("humcap-server listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
