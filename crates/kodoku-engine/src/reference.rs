//! Static reference data
//!
//! Chokepoint and route registries, country centroids, the FIPS 10-4 →
//! ISO 3166-1 alpha-3 lookup used by the GDELT geo fields, the target
//! allowlist, historical crisis fingerprints and the maritime vocabulary.
//!
//! Everything here is immutable. Lookup maps are built once on first use.

use crate::GeoPoint;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Chokepoint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChokePointType {
    Energy,
    Trade,
}

/// Nominal (static) risk level of a chokepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A maritime chokepoint
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChokePoint {
    pub id: &'static str,
    pub name: &'static str,
    pub location: GeoPoint,
    #[serde(rename = "type")]
    pub kind: ChokePointType,
    pub risk_level: RiskLevel,
}

/// A shipping route as an ordered traversal of chokepoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Route {
    pub id: &'static str,
    pub name: &'static str,
    pub chokepoints: &'static [&'static str],
}

/// Chokepoint registry (coordinates are longitude, latitude)
pub static CHOKE_POINTS: [ChokePoint; 8] = [
    ChokePoint {
        id: "hormuz",
        name: "Strait of Hormuz",
        location: GeoPoint::new(56.48, 26.56),
        kind: ChokePointType::Energy,
        risk_level: RiskLevel::High,
    },
    ChokePoint {
        id: "malacca",
        name: "Strait of Malacca",
        location: GeoPoint::new(100.0, 4.0),
        kind: ChokePointType::Trade,
        risk_level: RiskLevel::Medium,
    },
    ChokePoint {
        id: "suez",
        name: "Suez Canal",
        location: GeoPoint::new(32.35, 30.60),
        kind: ChokePointType::Trade,
        risk_level: RiskLevel::High,
    },
    ChokePoint {
        id: "bab_el_mandeb",
        name: "Bab-el-Mandeb",
        location: GeoPoint::new(43.32, 12.58),
        kind: ChokePointType::Energy,
        risk_level: RiskLevel::High,
    },
    ChokePoint {
        id: "panama",
        name: "Panama Canal",
        location: GeoPoint::new(-79.91, 9.08),
        kind: ChokePointType::Trade,
        risk_level: RiskLevel::Low,
    },
    ChokePoint {
        id: "taiwan",
        name: "Taiwan Strait",
        location: GeoPoint::new(119.5, 24.5),
        kind: ChokePointType::Trade,
        risk_level: RiskLevel::High,
    },
    ChokePoint {
        id: "bosporus",
        name: "Bosporus Strait",
        location: GeoPoint::new(29.07, 41.02),
        kind: ChokePointType::Trade,
        risk_level: RiskLevel::Medium,
    },
    ChokePoint {
        id: "cape_of_good_hope",
        name: "Cape of Good Hope",
        location: GeoPoint::new(18.47, -34.35),
        kind: ChokePointType::Trade,
        risk_level: RiskLevel::Low,
    },
];

/// Route registry
pub static ROUTES: [Route; 6] = [
    Route {
        id: "middle_east_to_japan",
        name: "Energy Route (Middle East - Japan)",
        chokepoints: &["hormuz", "malacca", "taiwan"],
    },
    Route {
        id: "middle_east_to_europe",
        name: "Energy Route (Middle East - Europe)",
        chokepoints: &["hormuz", "bab_el_mandeb", "suez"],
    },
    Route {
        id: "asia_to_europe_suez",
        name: "Trade Route (Asia - Europe via Suez)",
        chokepoints: &["malacca", "bab_el_mandeb", "suez"],
    },
    Route {
        id: "asia_to_europe_cape",
        name: "Trade Route (Asia - Europe via Cape)",
        chokepoints: &["malacca", "cape_of_good_hope"],
    },
    Route {
        id: "americas_to_asia",
        name: "Trade Route (Americas - Asia)",
        chokepoints: &["panama", "taiwan"],
    },
    Route {
        id: "black_sea_to_mediterranean",
        name: "Trade Route (Black Sea - Mediterranean)",
        chokepoints: &["bosporus", "suez"],
    },
];

/// Target countries (ISO 3166-1 alpha-3)
pub static TARGET_COUNTRIES: &[&str] = &[
    // Africa
    "EGY", "ZAF", "NGA", "KEN", "ETH", "SDN", "COD", "SOM", "LBY", "MLI",
    "BFA", "NER", "TCD", "MOZ", "CAF", "CMR", "BDI", "SSD", "ZWE", "AGO",
    // Middle East
    "SAU", "IRN", "IRQ", "ISR", "JOR", "LBN", "SYR", "YEM", "ARE", "QAT",
    "KWT", "OMN", "BHR", "TUR", "PSE",
    // Southeast Asia+
    "IDN", "MYS", "PHL", "SGP", "THA", "VNM", "KHM", "LAO", "MMR", "BRN",
    "TLS", "TWN",
    // South America
    "BRA", "ARG", "COL", "PER", "VEN", "CHL", "ECU", "BOL", "PRY", "URY",
    "GUY", "SUR",
];

/// Approximate country centroids (ISO3, longitude, latitude)
static COUNTRY_CENTROIDS: &[(&str, f64, f64)] = &[
    // Africa
    ("EGY", 30.80, 26.82), ("ZAF", 25.08, -29.00), ("NGA", 8.68, 9.08),
    ("KEN", 37.91, 0.02), ("ETH", 40.49, 9.15), ("SDN", 30.22, 12.86),
    ("COD", 21.76, -4.04), ("SOM", 46.20, 5.15), ("LBY", 17.23, 26.34),
    ("MLI", -3.99, 17.57), ("BFA", -1.56, 12.24), ("NER", 8.08, 17.61),
    ("TCD", 18.73, 15.45), ("MOZ", 35.53, -18.67), ("CAF", 20.94, 6.61),
    ("CMR", 12.35, 7.37), ("BDI", 29.92, -3.37), ("SSD", 31.31, 6.88),
    ("ZWE", 29.15, -19.02), ("AGO", 17.87, -11.20),
    // Middle East
    ("SAU", 45.08, 23.89), ("IRN", 53.69, 32.43), ("IRQ", 43.68, 33.22),
    ("ISR", 34.85, 31.05), ("JOR", 36.24, 30.59), ("LBN", 35.86, 33.87),
    ("SYR", 38.99, 34.80), ("YEM", 48.52, 15.55), ("ARE", 53.85, 23.42),
    ("QAT", 51.18, 25.35), ("KWT", 47.48, 29.31), ("OMN", 55.92, 21.47),
    ("BHR", 50.56, 26.07), ("TUR", 35.24, 38.96), ("PSE", 35.23, 31.95),
    // Southeast Asia+
    ("IDN", 113.92, -0.79), ("MYS", 101.98, 4.21), ("PHL", 121.77, 12.88),
    ("SGP", 103.82, 1.35), ("THA", 100.99, 15.87), ("VNM", 108.28, 14.06),
    ("KHM", 104.99, 12.57), ("LAO", 102.50, 19.86), ("MMR", 96.68, 21.91),
    ("BRN", 114.73, 4.54), ("TLS", 125.73, -8.87), ("TWN", 120.96, 23.70),
    // South America
    ("BRA", -51.93, -14.24), ("ARG", -63.62, -38.42), ("COL", -74.30, 4.57),
    ("PER", -75.02, -9.19), ("VEN", -66.59, 6.42), ("CHL", -71.54, -35.68),
    ("ECU", -78.18, -1.83), ("BOL", -63.59, -16.29), ("PRY", -58.44, -23.44),
    ("URY", -55.77, -32.52), ("GUY", -58.93, 4.86), ("SUR", -56.03, 3.92),
];

/// FIPS 10-4 → ISO3 base table. Contested codes live in [`FIPS_OVERRIDES`].
static FIPS_TO_ISO3: &[(&str, &str)] = &[
    ("US", "USA"), ("CH", "CHN"), ("JA", "JPN"), ("RS", "RUS"), ("GM", "DEU"),
    ("FR", "FRA"), ("UK", "GBR"), ("IT", "ITA"), ("SP", "ESP"), ("PO", "PRT"),
    ("AS", "AUS"), ("CA", "CAN"), ("MX", "MEX"), ("BR", "BRA"), ("AR", "ARG"),
    ("IN", "IND"), ("PK", "PAK"), ("AF", "AFG"), ("IZ", "IRQ"), ("IR", "IRN"),
    ("SY", "SYR"), ("IS", "ISR"), ("JO", "JOR"), ("LE", "LBN"), ("SA", "SAU"),
    ("AE", "ARE"), ("QA", "QAT"), ("KU", "KWT"), ("BA", "BHR"), ("YM", "YEM"),
    ("TU", "TUR"), ("EG", "EGY"), ("LY", "LBY"), ("TS", "TUN"), ("MO", "MAR"),
    ("AG", "DZA"), ("SU", "SDN"), ("ET", "ETH"), ("KE", "KEN"), ("SO", "SOM"),
    ("NI", "NGA"), ("GH", "GHA"), ("SG", "SEN"), ("ML", "MLI"), ("IV", "CIV"),
    ("ZI", "ZWE"), ("ZA", "ZAF"), ("AO", "AGO"), ("MZ", "MOZ"), ("TZ", "TZA"),
    ("UG", "UGA"), ("RW", "RWA"), ("CG", "COD"), ("CF", "CAF"), ("CM", "CMR"),
    ("GA", "GAB"), ("SE", "SWE"), ("NO", "NOR"), ("FI", "FIN"), ("DA", "DNK"),
    ("NL", "NLD"), ("BE", "BEL"), ("SW", "CHE"), ("PL", "POL"), ("EZ", "CZE"),
    ("LO", "SVK"), ("HU", "HUN"), ("RO", "ROU"), ("BU", "BGR"), ("GR", "GRC"),
    ("AL", "ALB"), ("HR", "HRV"), ("SR", "SRB"), ("MK", "MKD"), ("SI", "SVN"),
    ("LH", "LTU"), ("LG", "LVA"), ("EN", "EST"), ("MD", "MDA"), ("UP", "UKR"),
    ("GG", "GEO"), ("AM", "ARM"), ("AJ", "AZE"), ("KZ", "KAZ"), ("UZ", "UZB"),
    ("TM", "TKM"), ("KG", "KGZ"), ("TI", "TJK"), ("MN", "MNG"), ("KS", "KOR"),
    ("KN", "PRK"), ("TW", "TWN"), ("VM", "VNM"), ("TH", "THA"), ("MY", "MYS"),
    ("SN", "SGP"), ("PH", "PHL"), ("ID", "IDN"), ("BM", "MMR"), ("CB", "KHM"),
    ("LA", "LAO"), ("NP", "NPL"), ("BG", "BGD"), ("CE", "LKA"), ("MV", "MDV"),
    ("BT", "BTN"), ("NZ", "NZL"), ("FJ", "FJI"), ("PP", "PNG"), ("CU", "CUB"),
    ("CO", "COL"), ("VE", "VEN"), ("PE", "PER"), ("CI", "CHL"), ("EC", "ECU"),
    ("UY", "URY"), ("PY", "PRY"), ("GT", "GTM"), ("HO", "HND"), ("ES", "SLV"),
    ("NU", "NIC"), ("CS", "CRI"), ("PM", "PAN"), ("BH", "BLZ"), ("JM", "JAM"),
    ("TD", "TTO"), ("DR", "DOM"), ("HA", "HTI"), ("CJ", "CYM"), ("IC", "ISL"),
    ("LU", "LUX"), ("MT", "MLT"), ("CY", "CYP"), ("MP", "COM"), ("SC", "SYC"),
    ("CV", "CPV"), ("UV", "BFA"), ("NG", "NER"), ("CD", "TCD"), ("OD", "SSD"),
    ("GY", "GUY"), ("NS", "SUR"), ("BX", "BRN"), ("TT", "TLS"),
    // Palestinian Territories: Gaza and West Bank share one ISO3 code
    ("GZ", "PSE"), ("WE", "PSE"),
];

/// A FIPS code whose mapping collided in older tables, with the canonical choice
#[derive(Debug, Clone, Copy)]
pub struct FipsOverride {
    pub fips: &'static str,
    pub iso3: &'static str,
    /// The mapping this entry displaces
    pub displaced: &'static str,
}

/// Canonical mappings for contested FIPS codes
pub static FIPS_OVERRIDES: &[FipsOverride] = &[
    // Austria; Australia is AS
    FipsOverride { fips: "AU", iso3: "AUT", displaced: "AUS" },
    // Bolivia; Bosnia and Herzegovina is BK in FIPS 10-4 and is not mapped
    FipsOverride { fips: "BO", iso3: "BOL", displaced: "BIH" },
    // Burundi; Belarus is BO in FIPS 10-4 and is not mapped
    FipsOverride { fips: "BY", iso3: "BDI", displaced: "BLR" },
    // Oman; Mauritius is MP in FIPS 10-4 and is not mapped
    FipsOverride { fips: "MU", iso3: "OMN", displaced: "MUS" },
];

/// Historical crisis fingerprint
///
/// A named event signature: which CAMEO root codes must dominate, how large
/// their share must be, whether maritime vocabulary must be present or
/// absent, and the weight applied when the signature matches.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrisisFingerprint {
    pub id: &'static str,
    pub description: &'static str,
    pub event_codes: &'static [&'static str],
    pub share: ShareRule,
    pub maritime: MaritimeSignal,
    pub weight: f64,
}

/// Share condition on the fingerprint's event codes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ShareRule {
    /// Strictly greater than
    MoreThan(f64),
    /// Greater than or equal
    AtLeast(f64),
}

impl ShareRule {
    pub fn holds(&self, share: f64) -> bool {
        match *self {
            ShareRule::MoreThan(limit) => share > limit,
            ShareRule::AtLeast(limit) => share >= limit,
        }
    }
}

/// Maritime vocabulary condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MaritimeSignal {
    Present,
    Absent,
}

/// Fingerprint ids
pub const INTERNAL_UNREST: &str = "internal_unrest";
pub const SUEZ_BLOCKADE: &str = "suez_blockade";

/// Fingerprints in evaluation order; the first match wins
pub static HISTORICAL_CRISES: &[CrisisFingerprint] = &[
    CrisisFingerprint {
        id: INTERNAL_UNREST,
        description: "Mass protest with no maritime signal",
        event_codes: &["14"],
        share: ShareRule::MoreThan(0.500000000),
        maritime: MaritimeSignal::Absent,
        weight: 0.100000000,
    },
    CrisisFingerprint {
        id: SUEZ_BLOCKADE,
        description: "Kinetic military action entangled with shipping lanes",
        event_codes: &["18", "19", "20"],
        share: ShareRule::AtLeast(0.250000000),
        maritime: MaritimeSignal::Present,
        weight: 2.000000000,
    },
];

/// Tokens that tie a country's news coverage to shipping lanes
pub static MARITIME_KEYWORDS: &[&str] = &[
    "canal", "strait", "straits", "missile", "missiles", "tanker", "tankers",
    "naval", "navy", "warship", "warships", "frigate", "destroyer", "vessel",
    "vessels", "ship", "ships", "shipping", "cargo", "container", "maritime",
    "port", "blockade", "piracy", "pirates", "hijack", "hijacked", "seized",
    "drone", "drones", "houthi", "houthis", "suez", "hormuz", "malacca",
    "bosporus", "mandeb", "redsea",
];

static CENTROID_MAP: Lazy<HashMap<&'static str, GeoPoint>> = Lazy::new(|| {
    COUNTRY_CENTROIDS
        .iter()
        .map(|&(iso3, lon, lat)| (iso3, GeoPoint::new(lon, lat)))
        .collect()
});

static TARGET_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| TARGET_COUNTRIES.iter().copied().collect());

static FIPS_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static str> = FIPS_TO_ISO3.iter().copied().collect();
    for o in FIPS_OVERRIDES {
        map.insert(o.fips, o.iso3);
    }
    map
});

static MARITIME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| MARITIME_KEYWORDS.iter().copied().collect());

/// Normalize a FIPS 10-4 country code to ISO3
///
/// Surrounding whitespace is ignored; the code itself must match exactly
/// (FIPS codes are uppercase).
pub fn normalize_country(fips: &str) -> Option<&'static str> {
    FIPS_MAP.get(fips.trim()).copied()
}

/// Whether an ISO3 code is in the target allowlist
pub fn is_target_country(iso3: &str) -> bool {
    TARGET_SET.contains(iso3)
}

/// Centroid of a country by ISO3 code
pub fn country_centroid(iso3: &str) -> Option<GeoPoint> {
    CENTROID_MAP.get(iso3).copied()
}

/// Whether a lowercase token belongs to the maritime vocabulary
pub fn is_maritime_keyword(token: &str) -> bool {
    MARITIME_SET.contains(token)
}

/// Look up a chokepoint by id
pub fn chokepoint(id: &str) -> Option<&'static ChokePoint> {
    CHOKE_POINTS.iter().find(|cp| cp.id == id)
}

/// Look up a fingerprint by id
pub fn fingerprint(id: &str) -> Option<&'static CrisisFingerprint> {
    HISTORICAL_CRISES.iter().find(|f| f.id == id)
}
