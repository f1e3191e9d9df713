//! GDELT 2.0 Events Feed
//!
//! Fetches the latest 15-minute events export, parses the tab-separated
//! rows into [`RawEvent`]s and hands them to the KODOKU aggregator.
//!
//! # Columns
//!
//! | Index | Column                  | Used as        |
//! |-------|-------------------------|----------------|
//! | 28    | `EventRootCode`         | root code      |
//! | 29    | `QuadClass`             | quad class     |
//! | 30    | `GoldsteinScale`        | severity       |
//! | 37    | `Actor1Geo_CountryCode` | FIPS country   |
//! | 60    | `SOURCEURL`             | top news / keywords |
//!
//! [`RawEvent`]: kodoku_engine::RawEvent

use thiserror::Error;

pub mod fetch;
pub mod parser;

pub use fetch::{extract_csv, parse_lastupdate, ExportRef, FeedConfig, GdeltClient};
pub use parser::{parse_export, parse_row};

/// Fields per row in a GDELT 2.0 events export
pub const EXPORT_COLUMN_COUNT: usize = 61;

pub const COL_EVENT_ROOT_CODE: usize = 28;
pub const COL_QUAD_CLASS: usize = 29;
pub const COL_GOLDSTEIN_SCALE: usize = 30;
pub const COL_ACTOR1_GEO_COUNTRY_CODE: usize = 37;
pub const COL_SOURCE_URL: usize = 60;

/// Index of the latest 15-minute update files
pub const LASTUPDATE_URL: &str = "http://data.gdeltproject.org/gdeltv2/lastupdate.txt";

/// Suffix identifying the events export in `lastupdate.txt`
pub const EXPORT_SUFFIX: &str = "export.CSV.zip";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export.CSV.zip URL not found in lastupdate.txt")]
    MissingExportUrl,
    #[error("No .CSV entry in export archive")]
    NoCsvInArchive,
    #[error("Line {line}: expected {expected} fields, found {found}")]
    Arity {
        line: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, FeedError>;
