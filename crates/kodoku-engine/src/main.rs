//! KODOKU Engine CLI
//!
//! Propagates a country risk snapshot onto chokepoints and writes route
//! survival reports.
//!
//! Usage:
//!   kodoku --input public/data/daily_risk_score.json \
//!          --output public/data/kodoku_reports.json \
//!          [--config engine.json] [--verbose]
//!
//! `KODOKU_DATA_DIR` overrides the default data directory (`public/data`).

use anyhow::{Context, Result};
use clap::Parser;
use kodoku_engine::{loader, run_engine, EngineConfig, SurvivalTier};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATA_DIR: &str = "public/data";

#[derive(Parser, Debug)]
#[command(
    name = "kodoku",
    about = "Compute chokepoint disruption and route survival from a risk snapshot"
)]
struct Args {
    /// Risk snapshot JSON (default: $KODOKU_DATA_DIR/daily_risk_score.json)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Report JSON (default: $KODOKU_DATA_DIR/kodoku_reports.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine config JSON; model defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "kodoku_engine=debug,info"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = PathBuf::from(
        std::env::var("KODOKU_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
    );
    let input = args
        .input
        .unwrap_or_else(|| data_dir.join("daily_risk_score.json"));
    let output = args
        .output
        .unwrap_or_else(|| data_dir.join("kodoku_reports.json"));

    info!("=== Project KODOKU Engine Start ===");

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let snapshot = loader::load_snapshot(&input)
        .with_context(|| format!("loading risk snapshot {}", input.display()))?;

    let report = run_engine(&snapshot, &config);

    loader::save_json(&output, &report)
        .with_context(|| format!("writing report {}", output.display()))?;

    // Summary
    info!("{}", "=".repeat(60));
    info!("ROUTE SUMMARY");
    info!("{}", "=".repeat(60));
    for route in &report.routes {
        info!(
            "  {:>6.1}% [{:8}] {:45} critical: {}",
            route.survival_rate,
            SurvivalTier::from_rate(route.survival_rate).to_string(),
            route.name,
            route.critical_node
        );
    }
    if let Some(weakest) = report.weakest_route() {
        info!("Weakest route: {} ({:.1}%)", weakest.name, weakest.survival_rate);
    }

    info!("=== Project KODOKU Engine Complete ===");
    Ok(())
}
