//! Engine configuration
//!
//! Every field defaults to the model constants, so `{}` is a valid config file
//! and a partial file only overrides what it names.

use crate::{
    EngineError, Result, INFLUENCE_RADIUS_KM, MATERIAL_CONFLICT_QUAD_CLASS,
    NORMALIZATION_DIVISOR, PROTEST_ROOT_CODE, RISK_THRESHOLD, SCORE_DIVISOR,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Event aggregation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// QuadClass kept as material conflict (default: 4)
    pub conflict_quad_class: i64,
    /// EventRootCode kept as protest / riot (default: 14)
    pub protest_root_code: i64,
    /// Divisor from summed |Goldstein| to risk score (default: 10.0)
    pub score_divisor: f64,
    /// Countries below this risk score are dropped (default: 2.0, inclusive)
    pub risk_threshold: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            conflict_quad_class: MATERIAL_CONFLICT_QUAD_CLASS,
            protest_root_code: PROTEST_ROOT_CODE,
            score_divisor: SCORE_DIVISOR,
            risk_threshold: RISK_THRESHOLD,
        }
    }
}

/// Gravity propagation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Influence radius around each chokepoint in km (default: 1500)
    pub influence_radius_km: f64,
    /// Crisis score → percent divisor (default: 30.0)
    pub normalization_divisor: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            influence_radius_km: INFLUENCE_RADIUS_KM,
            normalization_divisor: NORMALIZATION_DIVISOR,
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aggregator: AggregatorConfig,
    pub propagation: PropagationConfig,
}

impl EngineConfig {
    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine config from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: EngineConfig = serde_json::from_reader(reader)?;
        config.validate()?;

        Ok(config)
    }

    /// Reject parameters that would make the model divide by zero or go negative
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("aggregator.score_divisor", self.aggregator.score_divisor),
            ("propagation.influence_radius_km", self.propagation.influence_radius_km),
            ("propagation.normalization_divisor", self.propagation.normalization_divisor),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let threshold = self.aggregator.risk_threshold;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "aggregator.risk_threshold must be non-negative, got {}",
                threshold
            )));
        }

        Ok(())
    }
}
