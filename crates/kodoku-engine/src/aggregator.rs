//! Conflict event aggregation
//!
//! Turns raw GDELT-shaped event rows into one risk record per target country:
//!
//! ```text
//! keep      = QuadClass == 4 ∨ EventRootCode == 14
//! base      = |GoldsteinScale|
//! risk(c)   = Σ base / 10            (kept if ≥ 2.0)
//! top_news  = URL of the first row with the highest base
//! ```
//!
//! The root-code histogram and URL keyword set ride along for context
//! classification during propagation.

use crate::config::AggregatorConfig;
use crate::reference::{is_target_country, normalize_country};
use crate::round_to;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Aggregated risk per ISO3 country code, in canonical (sorted) order
pub type RiskSnapshot = BTreeMap<String, CountryRiskRecord>;

/// URL scaffolding that carries no meaning as a keyword
const URL_NOISE: &[&str] = &[
    "http", "https", "www", "com", "org", "net", "html", "htm", "php", "asp", "aspx", "amp",
    "index",
];

/// Minimum keyword length kept from a URL
const MIN_KEYWORD_LEN: usize = 3;

/// One event row as observed in the feed
///
/// Numeric fields are `None` when the feed value was missing or not a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// FIPS 10-4 country code of the actor's location
    pub country_code: Option<String>,
    /// GDELT QuadClass (1-4)
    pub quad_class: Option<i64>,
    /// CAMEO EventRootCode (1-20)
    pub root_code: Option<i64>,
    /// Goldstein scale (-10 to +10)
    pub goldstein: Option<f64>,
    pub source_url: Option<String>,
}

impl RawEvent {
    pub fn new(
        country_code: &str,
        quad_class: i64,
        root_code: i64,
        goldstein: f64,
        source_url: &str,
    ) -> Self {
        Self {
            country_code: Some(country_code.to_string()),
            quad_class: Some(quad_class),
            root_code: Some(root_code),
            goldstein: Some(goldstein).filter(|g| g.is_finite()),
            source_url: Some(source_url.to_string()).filter(|u| !u.trim().is_empty()),
        }
    }

    /// Build from raw text fields, coercing anything non-numeric to missing
    pub fn from_fields(
        country_code: &str,
        quad_class: &str,
        root_code: &str,
        goldstein: &str,
        source_url: &str,
    ) -> Self {
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Self {
            country_code: non_blank(country_code),
            quad_class: parse_code(quad_class),
            root_code: parse_code(root_code),
            goldstein: parse_number(goldstein),
            source_url: non_blank(source_url),
        }
    }

    /// Severity magnitude used for scoring
    pub fn base_score(&self) -> Option<f64> {
        self.goldstein.map(f64::abs)
    }
}

/// Parse a finite number, treating anything else as missing
fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integral code such as "14", "04" or "4.0"
fn parse_code(field: &str) -> Option<i64> {
    parse_number(field)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

/// Risk record for one country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRiskRecord {
    pub risk_score: f64,
    pub count: u64,
    #[serde(default)]
    pub top_news: String,
    /// Root event code → occurrences (absent in legacy snapshots)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_codes: Option<BTreeMap<String, u64>>,
    /// Lowercase URL tokens (absent in legacy snapshots)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<BTreeSet<String>>,
}

impl CountryRiskRecord {
    /// Record without context signature, as written before context classification existed
    pub fn legacy(risk_score: f64, count: u64, top_news: impl Into<String>) -> Self {
        Self {
            risk_score,
            count,
            top_news: top_news.into(),
            event_codes: None,
            keywords: None,
        }
    }

    /// Attach an event-code histogram and keyword set
    pub fn with_signature(mut self, event_codes: &[(&str, u64)], keywords: &[&str]) -> Self {
        self.event_codes = Some(
            event_codes
                .iter()
                .map(|&(code, n)| (code.to_string(), n))
                .collect(),
        );
        self.keywords = Some(keywords.iter().map(|k| k.to_lowercase()).collect());
        self
    }
}

/// Running totals for one country
#[derive(Debug, Default)]
struct CountryAccumulator {
    score_sum: f64,
    count: u64,
    top: Option<(f64, String)>,
    event_codes: BTreeMap<String, u64>,
    keywords: BTreeSet<String>,
}

impl CountryAccumulator {
    fn add(&mut self, event: &RawEvent) {
        self.count += 1;

        let base = event.base_score();
        if let Some(score) = base {
            self.score_sum += score;
        }

        // Strict comparison keeps the first-seen row on ties
        if let (Some(score), Some(url)) = (base, event.source_url.as_ref()) {
            let better = match &self.top {
                Some((best, _)) => score > *best,
                None => true,
            };
            if better {
                self.top = Some((score, url.clone()));
            }
        }

        if let Some(code) = event.root_code {
            *self.event_codes.entry(code.to_string()).or_insert(0) += 1;
        }

        if let Some(url) = &event.source_url {
            self.keywords.extend(url_keywords(url));
        }
    }

    fn into_record(self, risk_score: f64) -> CountryRiskRecord {
        CountryRiskRecord {
            risk_score: round_to(risk_score, 4),
            count: self.count,
            top_news: self.top.map(|(_, url)| url).unwrap_or_default(),
            event_codes: Some(self.event_codes),
            keywords: Some(self.keywords),
        }
    }
}

/// Extract lowercase keyword tokens from a source URL
///
/// URLs carry their words in slug segments, so every non-alphanumeric
/// character (whitespace included) separates tokens.
pub fn url_keywords(url: &str) -> impl Iterator<Item = String> + '_ {
    url.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .map(|t| t.to_lowercase())
        .filter(|t| !URL_NOISE.contains(&t.as_str()))
}

/// Whether an event counts as conflict under the configured sentinels
pub fn is_conflict_event(event: &RawEvent, config: &AggregatorConfig) -> bool {
    event.quad_class == Some(config.conflict_quad_class)
        || event.root_code == Some(config.protest_root_code)
}

/// Aggregate raw events into per-country risk records
pub fn aggregate_events<'a, I>(events: I, config: &AggregatorConfig) -> RiskSnapshot
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    let mut groups: BTreeMap<&'static str, CountryAccumulator> = BTreeMap::new();
    let mut total = 0usize;
    let mut conflict_rows = 0usize;

    for event in events {
        total += 1;
        if !is_conflict_event(event, config) {
            continue;
        }
        conflict_rows += 1;

        let Some(iso3) = event.country_code.as_deref().and_then(normalize_country) else {
            continue;
        };
        if !is_target_country(iso3) {
            continue;
        }

        groups.entry(iso3).or_default().add(event);
    }

    let mut snapshot = RiskSnapshot::new();
    for (iso3, acc) in groups {
        let risk_score = acc.score_sum / config.score_divisor;
        if risk_score < config.risk_threshold {
            debug!(
                "Dropping {}: risk_score={:.4} below threshold {:.1}",
                iso3, risk_score, config.risk_threshold
            );
            continue;
        }
        snapshot.insert(iso3.to_string(), acc.into_record(risk_score));
    }

    info!(
        "Aggregated {} countries from {} events ({} conflict rows)",
        snapshot.len(),
        total,
        conflict_rows
    );

    snapshot
}
