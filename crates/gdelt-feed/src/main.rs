//! GDELT Risk Snapshot CLI
//!
//! Downloads the latest GDELT 2.0 events export and aggregates it into the
//! per-country risk snapshot consumed by `kodoku`.
//!
//! Usage:
//!   fetch-gdelt [--input 20260301121500.export.CSV.zip] \
//!               [--output public/data/daily_risk_score.json] \
//!               [--config engine.json] [--verbose]

use anyhow::{Context, Result};
use clap::Parser;
use gdelt_feed::{extract_csv, parse_export, FeedConfig, GdeltClient};
use kodoku_engine::{aggregate_events, loader, EngineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATA_DIR: &str = "public/data";

#[derive(Parser, Debug)]
#[command(
    name = "fetch-gdelt",
    about = "Aggregate the latest GDELT events export into a country risk snapshot"
)]
struct Args {
    /// Local export (.zip or .CSV) instead of downloading
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Snapshot JSON (default: $KODOKU_DATA_DIR/daily_risk_score.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine config JSON; model defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn read_local_export(path: &Path) -> Result<String> {
    info!("Reading local export {:?}", path);
    let is_zip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);

    let bytes = fs::read(path)?;
    if is_zip {
        Ok(extract_csv(&bytes)?)
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "gdelt_feed=debug,kodoku_engine=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(
            std::env::var("KODOKU_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        )
        .join("daily_risk_score.json")
    });

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let text = match &args.input {
        Some(path) => read_local_export(path)
            .with_context(|| format!("reading export {}", path.display()))?,
        None => {
            let client = GdeltClient::new(FeedConfig::from_env())?;
            let (export, text) = client
                .fetch_latest()
                .await
                .context("fetching latest GDELT export")?;
            if let Some(ts) = export.snapshot {
                info!("Snapshot time: {} UTC", ts);
            }
            text
        }
    };

    let events = parse_export(&text)?;
    info!("Loaded {} rows", events.len());

    let snapshot = aggregate_events(&events, &config.aggregator);

    loader::save_json(&output, &snapshot)
        .with_context(|| format!("writing snapshot {}", output.display()))?;

    info!("Done. {} countries above threshold", snapshot.len());
    Ok(())
}
