//! Context multiplier
//!
//! Scales a country's risk contribution by the qualitative nature of its
//! events. The rule table is [`HISTORICAL_CRISES`], evaluated in order:
//!
//! | Fingerprint       | Codes        | Share  | Maritime | Result          |
//! |-------------------|--------------|--------|----------|-----------------|
//! | `internal_unrest` | 14           | > 0.5  | absent   | Attenuate(0.1)  |
//! | `suez_blockade`   | 18, 19, 20   | ≥ 0.25 | present  | Amplify(2.0)    |
//! | (no match)        |              |        |          | Neutral (1.0)   |
//!
//! This is a coarse two-bucket heuristic, not a classifier. New fingerprints
//! are added to the table, not here.

use crate::aggregator::CountryRiskRecord;
use crate::reference::{is_maritime_keyword, CrisisFingerprint, MaritimeSignal, HISTORICAL_CRISES};
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of context classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ContextMultiplier {
    Neutral,
    Amplify(f64),
    Attenuate(f64),
}

impl ContextMultiplier {
    /// Scalar applied to the country's risk score
    pub fn factor(&self) -> f64 {
        match *self {
            ContextMultiplier::Neutral => 1.000000000,
            ContextMultiplier::Amplify(w) | ContextMultiplier::Attenuate(w) => w,
        }
    }

    fn from_weight(weight: f64) -> Self {
        if weight > 1.0 {
            ContextMultiplier::Amplify(weight)
        } else if weight < 1.0 {
            ContextMultiplier::Attenuate(weight)
        } else {
            ContextMultiplier::Neutral
        }
    }
}

/// Event mix of one country, reduced to what the fingerprints look at
#[derive(Debug, Clone)]
pub struct EventSignature<'a> {
    event_codes: &'a BTreeMap<String, u64>,
    /// Sum of all counts, as f64
    total: f64,
    has_maritime: bool,
}

impl<'a> EventSignature<'a> {
    /// `None` when the record carries no event codes (legacy or empty)
    pub fn from_record(record: &'a CountryRiskRecord) -> Option<Self> {
        let event_codes = record.event_codes.as_ref()?;
        let total: f64 = event_codes.values().map(|&n| n as f64).sum();
        if total <= 0.0 {
            return None;
        }

        let has_maritime = record
            .keywords
            .as_ref()
            .map(|kws| kws.iter().any(|k| is_maritime_keyword(&k.to_lowercase())))
            .unwrap_or(false);

        Some(Self {
            event_codes,
            total,
            has_maritime,
        })
    }

    /// Fraction of all occurrences carried by the given root codes
    pub fn share_of(&self, codes: &[&str]) -> f64 {
        let hits: f64 = codes
            .iter()
            .filter_map(|code| self.event_codes.get(*code))
            .map(|&n| n as f64)
            .sum();
        hits / self.total
    }

    pub fn has_maritime(&self) -> bool {
        self.has_maritime
    }

    fn matches(&self, fingerprint: &CrisisFingerprint) -> bool {
        let maritime_ok = match fingerprint.maritime {
            MaritimeSignal::Present => self.has_maritime,
            MaritimeSignal::Absent => !self.has_maritime,
        };
        maritime_ok && fingerprint.share.holds(self.share_of(fingerprint.event_codes))
    }
}

/// First fingerprint matching the record, if any
pub fn matching_fingerprint(record: &CountryRiskRecord) -> Option<&'static CrisisFingerprint> {
    let signature = EventSignature::from_record(record)?;
    HISTORICAL_CRISES.iter().find(|fp| signature.matches(fp))
}

/// Classify a country's events into a context multiplier
pub fn context_multiplier(record: &CountryRiskRecord) -> ContextMultiplier {
    matching_fingerprint(record)
        .map(|fp| ContextMultiplier::from_weight(fp.weight))
        .unwrap_or(ContextMultiplier::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{INTERNAL_UNREST, SUEZ_BLOCKADE};

    fn record(codes: &[(&str, u64)], keywords: &[&str]) -> CountryRiskRecord {
        CountryRiskRecord::legacy(10.0, 10, "").with_signature(codes, keywords)
    }

    #[test]
    fn test_internal_protest_no_maritime() {
        let r = record(&[("14", 8), ("1", 2)], &["protest", "election", "police"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Attenuate(0.1));
        assert_eq!(context_multiplier(&r).factor(), 0.1);
        assert_eq!(matching_fingerprint(&r).map(|f| f.id), Some(INTERNAL_UNREST));
    }

    #[test]
    fn test_military_with_maritime() {
        let r = record(&[("19", 5), ("14", 2)], &["missile", "tanker", "attack"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Amplify(2.0));
        assert_eq!(context_multiplier(&r).factor(), 2.0);
        assert_eq!(matching_fingerprint(&r).map(|f| f.id), Some(SUEZ_BLOCKADE));
    }

    #[test]
    fn test_mixed_without_pattern_is_neutral() {
        let r = record(&[("18", 5), ("14", 3)], &["border", "conflict", "region"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Neutral);
        assert_eq!(context_multiplier(&r).factor(), 1.0);
    }

    #[test]
    fn test_empty_event_codes_is_neutral() {
        let r = record(&[], &[]);
        assert_eq!(context_multiplier(&r).factor(), 1.0);

        let zeroed = record(&[("14", 0)], &[]);
        assert_eq!(context_multiplier(&zeroed).factor(), 1.0);
    }

    #[test]
    fn test_legacy_record_is_neutral() {
        let r = CountryRiskRecord::legacy(5.0, 3, "");
        assert_eq!(context_multiplier(&r), ContextMultiplier::Neutral);
    }

    #[test]
    fn test_protest_with_maritime_not_attenuated() {
        let r = record(&[("14", 9), ("1", 1)], &["protest", "canal", "blocked"]);
        assert_ne!(context_multiplier(&r).factor(), 0.1);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Neutral);
    }

    #[test]
    fn test_protest_exactly_half_not_attenuated() {
        let r = record(&[("14", 5), ("1", 5)], &["protest"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Neutral);
    }

    #[test]
    fn test_trivial_military_share_not_amplified() {
        // 1 of 10 occurrences is kinetic
        let r = record(&[("19", 1), ("4", 9)], &["strait"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Neutral);

        // 1 of 4 reaches the share floor
        let r = record(&[("19", 1), ("4", 3)], &["strait"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Amplify(2.0));
    }

    #[test]
    fn test_military_without_maritime_is_neutral() {
        let r = record(&[("19", 9), ("20", 1)], &["border", "shelling"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Neutral);
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let r = record(&[("14", u64::MAX), ("1", 1)], &["protest"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Attenuate(0.1));

        let r = record(&[("19", u64::MAX), ("20", u64::MAX)], &["tanker"]);
        assert_eq!(context_multiplier(&r), ContextMultiplier::Amplify(2.0));
        let sig = EventSignature::from_record(&r).unwrap();
        assert_eq!(sig.share_of(&["18", "19", "20"]), 1.0);
    }

    #[test]
    fn test_share_of() {
        let r = record(&[("18", 1), ("19", 2), ("14", 1)], &[]);
        let sig = EventSignature::from_record(&r).unwrap();
        assert_eq!(sig.share_of(&["18", "19", "20"]), 0.75);
        assert_eq!(sig.share_of(&["14"]), 0.25);
        assert!(!sig.has_maritime());
    }
}
