//! Page Dump - writes consecutive simulation pages to a JSONL file
//!
//! Runs the same paging service as the HTTP server without a network
//! listener, for offline inspection or replay by visualization clients.
//!
//! Usage:
//!   page-dump --config config/dev.toml --pages 50 --out pages.jsonl

use anyhow::bail;
use clap::Parser;
use mock_feature_service::infra::{ConfigArgs, Metrics};
use mock_feature_service::io::{load_feature_set, PageEgress};
use mock_feature_service::services::MockService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Page Dump - offline page emission for the mock feature service
#[derive(Parser, Debug)]
#[command(name = "page-dump", version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Number of pages to emit
    #[arg(short = 'n', long, default_value = "10")]
    pages: usize,

    /// Output JSONL file (overrides egress.file)
    #[arg(short, long)]
    out: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = args.config.load();
    config.validate()?;

    let features = load_feature_set(config.paths_file())?;
    let metrics = Arc::new(Metrics::new());
    let mut service = MockService::new(&config)?.with_metrics(metrics.clone());
    service.initialize(&features);

    let out = args.out.as_deref().unwrap_or(config.egress_file());
    let egress = PageEgress::new(out);

    let mut written = 0usize;
    for _ in 0..args.pages {
        if egress.write_page(&service.next_page()) {
            written += 1;
        }
    }

    metrics.report().log();
    info!(pages = %written, requested = %args.pages, file = %out, "page_dump_complete");

    if written < args.pages {
        bail!("wrote {} of {} pages to {}", written, args.pages, out);
    }
    Ok(())
}
