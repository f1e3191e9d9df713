//! KODOKU Chokepoint Risk Engine
//!
//! Aggregates conflict events into per-country risk, propagates that risk
//! onto maritime chokepoints, and derives survival probabilities for the
//! shipping routes that traverse them.
//!
//! # Pipeline
//!
//! ```text
//! RawEvent* ──aggregate──▶ {ISO3 → CountryRiskRecord}
//!           ──propagate──▶ {chokepoint → disruption %}
//!           ──survival───▶ [RouteReport]
//! ```
//!
//! # Gravity Model
//!
//! ```text
//! crisis(cp)     = Σ risk(c) · ctx(c) · max(0, (R - d(cp, c)) / R)
//! disruption(cp) = clamp(crisis(cp) / N · 100, 0, 100)
//! survival(r)    = 100 - max(disruption(cp) for cp in r)
//! ```
//!
//! | Symbol | Default | Description |
//! |--------|---------|-------------|
//! | R      | 1500 km | Influence radius of a country around a chokepoint |
//! | N      | 30.0    | Normalization divisor from crisis score to percent |
//! | ctx    | 0.1 / 1.0 / 2.0 | Context multiplier (unrest / neutral / maritime crisis) |

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aggregator;
pub mod config;
pub mod context;
pub mod loader;
pub mod propagation;
pub mod reference;
pub mod report;
pub mod survival;

pub use aggregator::{aggregate_events, CountryRiskRecord, RawEvent, RiskSnapshot};
pub use config::{AggregatorConfig, EngineConfig, PropagationConfig};
pub use context::{context_multiplier, ContextMultiplier};
pub use propagation::{compute_chokepoint_disruption, ChokepointDisruption, ChokepointRisks};
pub use report::{run_engine, KodokuReport};
pub use survival::{compute_route_survival, RouteReport, SurvivalTier};

/// Radius inside which a country's conflict pressure reaches a chokepoint (km)
pub const INFLUENCE_RADIUS_KM: f64 = 1500.000000000;

/// Divisor mapping a raw crisis score onto a disruption percentage
pub const NORMALIZATION_DIVISOR: f64 = 30.000000000;

/// Minimum aggregated risk score for a country to be reported
pub const RISK_THRESHOLD: f64 = 2.000000000;

/// Divisor from summed Goldstein magnitude to risk score
pub const SCORE_DIVISOR: f64 = 10.000000000;

/// GDELT QuadClass for material conflict
pub const MATERIAL_CONFLICT_QUAD_CLASS: i64 = 4;

/// CAMEO root code for protest / riot events
pub const PROTEST_ROOT_CODE: i64 = 14;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.000000000;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// A point on the globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Great-circle distance to another point in km
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Great-circle distance in km on a spherical Earth (haversine)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let half_dphi = (lat2 - lat1).to_radians() / 2.0;
    let half_dlambda = (lon2 - lon1).to_radians() / 2.0;

    let h = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
