//! EWM main service.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ewm_core::EwmStore;
use ewm_http::init_logging;
use ewm_service::{create_router, AppState, ServiceConfig};
use ewm_stats::HttpStatsClient;

/// Explore With Me: events, participation requests and compilations
#[derive(Parser, Debug)]
#[command(name = "ewm-service")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ewm.yaml")]
    config: PathBuf,

    /// Listen address, overrides the configuration file
    #[arg(long)]
    listen_addr: Option<SocketAddr>,

    /// Stats service URL, overrides the configuration file
    #[arg(long)]
    stats_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServiceConfig::load(Some(&args.config))
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(addr) = args.listen_addr {
        config.listen_addr = addr;
    }
    if let Some(url) = args.stats_url {
        config.stats_url = url;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level, config.log_format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting ewm service");

    let stats = HttpStatsClient::new(&config.stats_url, config.stats_timeout())
        .with_context(|| format!("invalid stats url {}", config.stats_url))?;
    tracing::info!(stats_url = %stats.base_url(), app = %config.app_name, "Stats client ready");

    let state = AppState::new(Arc::new(EwmStore::new()), Arc::new(stats), &config.app_name);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;

    tracing::info!(addr = %config.listen_addr, "Service listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
