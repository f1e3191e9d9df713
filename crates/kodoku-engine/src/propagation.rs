//! Gravity propagation from countries onto chokepoints
//!
//! ```text
//! decay(d)       = (R - d) / R          for d < R, else 0
//! crisis(cp)     = Σ risk(c) · ctx(c) · decay(d(cp, centroid(c)))
//! disruption(cp) = clamp(crisis(cp) / N · 100, 0, 100)
//! ```
//!
//! Countries without a known centroid contribute nothing.

use crate::aggregator::RiskSnapshot;
use crate::config::PropagationConfig;
use crate::context::context_multiplier;
use crate::reference::{country_centroid, ChokePoint, CHOKE_POINTS};
use crate::{round_to, GeoPoint};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

/// Disruption estimate for one chokepoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChokepointDisruption {
    /// Map key when serialized inside [`ChokepointRisks`]
    #[serde(skip)]
    pub id: String,
    pub name: String,
    /// Blockage probability in percent, [0, 100], 1 decimal
    pub disruption_risk: f64,
    /// Unnormalized crisis score, 4 decimals
    pub crisis_score_raw: f64,
}

/// Disruption per chokepoint, in registry order
///
/// Serializes as a JSON object keyed by chokepoint id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChokepointRisks(Vec<ChokepointDisruption>);

impl ChokepointRisks {
    pub fn new(entries: Vec<ChokepointDisruption>) -> Self {
        Self(entries)
    }

    pub fn get(&self, id: &str) -> Option<&ChokepointDisruption> {
        self.0.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChokepointDisruption> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ChokepointRisks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.id, entry)?;
        }
        map.end()
    }
}

/// A country's weighted pressure at its centroid
#[derive(Debug, Clone)]
struct RiskSource<'a> {
    iso3: &'a str,
    centroid: GeoPoint,
    weighted_risk: f64,
}

/// Linear distance decay inside the influence radius
pub fn distance_decay(distance_km: f64, radius_km: f64) -> f64 {
    if distance_km < radius_km {
        (radius_km - distance_km) / radius_km
    } else {
        0.000000000
    }
}

/// Map a crisis score onto a disruption percentage (unrounded)
pub fn disruption_percent(crisis_score: f64, normalization_divisor: f64) -> f64 {
    (crisis_score / normalization_divisor * 100.000000000).clamp(0.000000000, 100.000000000)
}

fn risk_sources(snapshot: &RiskSnapshot) -> Vec<RiskSource<'_>> {
    snapshot
        .iter()
        .filter_map(|(iso3, record)| {
            let Some(centroid) = country_centroid(iso3) else {
                debug!("No centroid for {}, skipping", iso3);
                return None;
            };
            let multiplier = context_multiplier(record);
            if multiplier.factor() != 1.0 {
                debug!("Context multiplier for {}: {:?}", iso3, multiplier);
            }
            Some(RiskSource {
                iso3,
                centroid,
                weighted_risk: record.risk_score * multiplier.factor(),
            })
        })
        .collect()
}

fn crisis_score_at(location: &GeoPoint, sources: &[RiskSource<'_>], config: &PropagationConfig) -> f64 {
    sources
        .iter()
        .map(|src| {
            let distance = location.distance_km(&src.centroid);
            let decay = distance_decay(distance, config.influence_radius_km);
            if decay > 0.0 {
                debug!("  {} at {:.0} km contributes decay {:.3}", src.iso3, distance, decay);
            }
            src.weighted_risk * decay
        })
        .sum()
}

/// Disruption for an arbitrary set of chokepoints
pub fn propagate(
    snapshot: &RiskSnapshot,
    chokepoints: &[ChokePoint],
    config: &PropagationConfig,
) -> ChokepointRisks {
    let sources = risk_sources(snapshot);

    let entries = chokepoints
        .iter()
        .map(|cp| {
            let crisis_score = crisis_score_at(&cp.location, &sources, config);
            let disruption =
                round_to(disruption_percent(crisis_score, config.normalization_divisor), 1);

            info!(
                "  {}: crisis_score={:.4}  disruption_risk={:.1}%",
                cp.name, crisis_score, disruption
            );

            ChokepointDisruption {
                id: cp.id.to_string(),
                name: cp.name.to_string(),
                disruption_risk: disruption,
                crisis_score_raw: round_to(crisis_score, 4),
            }
        })
        .collect();

    ChokepointRisks(entries)
}

/// Disruption for every chokepoint in the registry
pub fn compute_chokepoint_disruption(
    snapshot: &RiskSnapshot,
    config: &PropagationConfig,
) -> ChokepointRisks {
    propagate(snapshot, &CHOKE_POINTS, config)
}
