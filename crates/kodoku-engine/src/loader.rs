//! Risk snapshot loading and JSON output

use crate::aggregator::{CountryRiskRecord, RiskSnapshot};
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Load `{ISO3: CountryRiskRecord}` from a JSON file
///
/// Records with a negative or non-finite risk score are dropped.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<RiskSnapshot> {
    let path = path.as_ref();
    info!("Loading risk snapshot from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: BTreeMap<String, CountryRiskRecord> = serde_json::from_reader(reader)?;

    let total = raw.len();
    let snapshot: RiskSnapshot = raw
        .into_iter()
        .filter(|(iso3, record)| {
            let ok = record.risk_score.is_finite() && record.risk_score >= 0.0;
            if !ok {
                warn!("Skipping {}: invalid risk_score {}", iso3, record.risk_score);
            }
            ok
        })
        .collect();

    info!("Loaded {} countries ({} skipped)", snapshot.len(), total - snapshot.len());
    Ok(snapshot)
}

/// Write a value as pretty-printed JSON, creating parent directories
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Saved {:?}", path);
    Ok(())
}
