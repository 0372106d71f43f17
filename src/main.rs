//! Mock feature service - synthetic moving point features over HTTP
//!
//! Simulates a population of assets moving along polyline paths and serves
//! their positions one page per query.
//!
//! Module structure:
//! - `domain/` - Core types (paths, kinematic state, observations)
//! - `services/` - Simulation logic (indexer, updater, paging service)
//! - `io/` - External interfaces (path loading, HTTP, egress)
//! - `infra/` - Infrastructure (Config, Metrics, errors)

use anyhow::Context;
use clap::Parser;
use mock_feature_service::infra::{ConfigArgs, Metrics};
use mock_feature_service::io::{load_feature_set, start_query_server};
use mock_feature_service::services::MockService;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Mock feature service - paged synthetic point features
#[derive(Parser, Debug)]
#[command(name = "mock-feature-service", version, about)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(git_hash = %env!("GIT_HASH"), "mock-feature-service starting");

    let args = Args::parse();

    let config = args.config.load();
    config.validate()?;

    info!(
        config_file = %config.config_file(),
        paths_file = %config.paths_file(),
        tracked_assets = %config.tracked_assets(),
        page_size = %config.page_size(),
        dist_step = %config.dist_step(),
        seed = ?config.seed(),
        port = %config.port(),
        "config_loaded"
    );

    let features = load_feature_set(config.paths_file())?;

    let metrics = Arc::new(Metrics::new());
    let mut service = MockService::new(&config)?.with_metrics(metrics.clone());
    service.initialize(&features);
    let service = Arc::new(Mutex::new(service));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Periodic metrics reporter
    let metrics_clone = metrics.clone();
    let metrics_interval = config.metrics_interval_secs().max(1);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        loop {
            interval.tick().await;
            metrics_clone.report().log();
        }
    });

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    let addr: SocketAddr = format!("{}:{}", config.bind_address(), config.port())
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address(), config.port()))?;

    start_query_server(addr, service, metrics, shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("mock-feature-service shutdown complete");
    Ok(())
}
