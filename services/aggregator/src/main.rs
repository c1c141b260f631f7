//! Wind archive aggregation service.
//!
//! Scans an archive of raw U/V component message dumps and aggregates
//! them into per-month wind-speed grid stores, recording completed
//! months in a ledger so reruns only fill in what is missing.

mod config;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use aggregation::{Aggregator, AggregatorConfig};
use wind_common::CancelFlag;

use config::AggregatorServiceConfig;

#[derive(Parser, Debug)]
#[command(name = "aggregator")]
#[command(about = "Aggregates wind component archives into monthly grids")]
struct Args {
    /// Configuration file path (environment variables used if absent)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the number of months processed concurrently
    #[arg(long)]
    parallel_months: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting wind archive aggregator");

    let mut config = match &args.config {
        Some(path) => AggregatorServiceConfig::from_yaml(path)?,
        None => AggregatorServiceConfig::from_env()?,
    };
    if let Some(parallel) = args.parallel_months {
        config.parallel_months = parallel;
    }
    info!(
        archive_root = %config.archive_root.display(),
        store_root = %config.store_root.display(),
        parallel_months = config.parallel_months,
        "Loaded configuration"
    );

    let cancel = CancelFlag::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight timesteps");
            interrupt.cancel();
        }
    });

    let aggregator = Aggregator::new(
        AggregatorConfig {
            archive_root: config.archive_root,
            store_root: config.store_root,
            parallel_months: config.parallel_months,
            grid: config.grid,
        },
        cancel,
    );

    let summary = aggregator.run().await?;
    info!(
        months_completed = summary.months_completed,
        months_skipped = summary.months_skipped,
        months_incomplete = summary.months_incomplete,
        timesteps_appended = summary.timesteps_appended,
        duplicates_skipped = summary.duplicates_skipped,
        samples_dropped = summary.samples_dropped,
        timesteps_failed = summary.timesteps_failed,
        cancelled = summary.cancelled,
        "Aggregation finished"
    );

    if summary.months_incomplete > 0 {
        anyhow::bail!("{} month(s) finished incomplete", summary.months_incomplete);
    }
    Ok(())
}
