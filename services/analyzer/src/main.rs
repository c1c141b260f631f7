//! Wind availability analysis service.
//!
//! Evaluates the operable-wind availability ratio for a table of
//! locations over the configured years and writes one
//! `wind_availability_{year}.csv` per year.

mod config;
mod locations;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use availability::{write_validity_csv, AvailabilityEngine, AvailabilityError};
use roughness::{ConstantRoughness, MonthlyRoughnessProvider, RoughnessSource};
use wind_common::CancelFlag;

use config::AnalyzerServiceConfig;
use locations::load_locations;

#[derive(Parser, Debug)]
#[command(name = "analyzer")]
#[command(about = "Computes operable-wind availability per location and year")]
struct Args {
    /// Configuration file path (environment variables used if absent)
    #[arg(short, long)]
    config: Option<String>,

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

    info!("Starting wind availability analyzer");

    let config = match &args.config {
        Some(path) => AnalyzerServiceConfig::from_yaml(path)?,
        None => AnalyzerServiceConfig::from_env()?,
    };
    config
        .analysis
        .validate()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(
        store_root = %config.store_root.display(),
        years = ?config.years,
        "Loaded configuration"
    );

    let cancel = CancelFlag::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current chunk");
            interrupt.cancel();
        }
    });

    // The evaluation is synchronous and rayon-parallel inside; run it
    // off the async runtime in one piece.
    let handle = tokio::task::spawn_blocking(move || run_analysis(config, cancel));
    handle.await?
}

fn run_analysis(config: AnalyzerServiceConfig, cancel: CancelFlag) -> Result<()> {
    let locations = load_locations(&config.locations_file)?;
    info!(locations = locations.len(), "Loaded location table");

    std::fs::create_dir_all(&config.output_dir)?;

    let default_z0 = config.analysis.default_z0;
    let mut provider: Box<dyn RoughnessSource> = match &config.roughness_root {
        Some(root) => {
            let provider = MonthlyRoughnessProvider::scan(root, default_z0)?;
            info!(
                roughness_root = %root.display(),
                grids = provider.available_months().count(),
                "Using monthly roughness grids"
            );
            Box::new(provider)
        }
        None => {
            info!(default_z0, "No roughness root configured, using uniform roughness");
            Box::new(ConstantRoughness::new(default_z0))
        }
    };

    let mut engine = AvailabilityEngine::new(
        config.store_root.clone(),
        config.analysis.clone(),
        cancel,
    )?;

    for &year in &config.years {
        let results = match engine.evaluate_year(year, &locations, provider.as_mut()) {
            Ok(results) => results,
            Err(AvailabilityError::Cancelled) => {
                warn!(year, "Analysis cancelled, partial year discarded");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let path = config
            .output_dir
            .join(format!("wind_availability_{year}.csv"));
        write_validity_csv(&path, &results)?;
        info!(year, output = %path.display(), rows = results.len(), "Year written");
    }

    Ok(())
}
