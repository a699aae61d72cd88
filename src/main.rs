mod app;
mod handlers;
mod models;
mod pages;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use app::cli::Args;
use app::config::{Config, FileConfig};
use clap::Parser;
use handlers::AppState;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_file = match &args.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
            Ok(path.clone())
        }
        None => dotenv::dotenv(),
    };

    init_tracing();
    match env_file {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let file_config = match &args.config {
        Some(path) => FileConfig::from_path(path)?,
        None => FileConfig::default(),
    };
    let mut config = Config::from_env(file_config).context("invalid configuration")?;
    if let Some(port) = args.port {
        config.server_port = port;
    }
    if config.client_key == "YOUR_CLIENT_KEY" {
        warn!("CLIENT_KEY is not set; the payment popup will not open");
    }

    info!(
        "Using {:?} gateway at {} (timeout {:?})",
        config.environment, config.gateway_url, config.gateway_timeout
    );

    let state = AppState::from_config(&config).context("failed to build gateway client")?;
    let app = handlers::router(state);

    let addr = format!("{}:{}", config.host, config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
