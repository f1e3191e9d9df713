//! Export discovery and download

use crate::{FeedError, Result, EXPORT_SUFFIX, LASTUPDATE_URL};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use std::time::Duration;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Transport settings for the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub lastupdate_url: String,
    /// Timeout for `lastupdate.txt` (default: 30 s)
    pub index_timeout_secs: u64,
    /// Timeout for the export archive (default: 120 s)
    pub download_timeout_secs: u64,
    /// Attempts per request, including the first (default: 3)
    pub max_attempts: u32,
    /// Linear backoff step between attempts (default: 5 s)
    pub backoff_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            lastupdate_url: LASTUPDATE_URL.to_string(),
            index_timeout_secs: 30,
            download_timeout_secs: 120,
            max_attempts: 3,
            backoff_secs: 5,
        }
    }
}

impl FeedConfig {
    /// Defaults, with `GDELT_LASTUPDATE_URL` overriding the index location
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lastupdate_url: std::env::var("GDELT_LASTUPDATE_URL")
                .unwrap_or(defaults.lastupdate_url.clone()),
            ..defaults
        }
    }
}

/// Location of one events export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRef {
    pub url: String,
    /// Snapshot time encoded in the file name, when parseable
    pub snapshot: Option<NaiveDateTime>,
}

impl ExportRef {
    pub fn from_url(url: &str) -> Self {
        let file_name = url.rsplit('/').next().unwrap_or(url);
        let snapshot = file_name
            .split('.')
            .next()
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, "%Y%m%d%H%M%S").ok());

        Self {
            url: url.to_string(),
            snapshot,
        }
    }
}

/// Find the events export in a `lastupdate.txt` body
///
/// Each line is `<size> <md5> <url>`; the export is the line whose URL ends
/// in `export.CSV.zip`.
pub fn parse_lastupdate(text: &str) -> Result<ExportRef> {
    text.lines()
        .filter_map(|line| line.split_whitespace().nth(2))
        .find(|url| url.ends_with(EXPORT_SUFFIX))
        .map(ExportRef::from_url)
        .ok_or(FeedError::MissingExportUrl)
}

/// Upper bound on the buffer reserved from an archive's declared entry size
const MAX_PREALLOC_BYTES: u64 = 64 * 1024 * 1024;

/// Buffer to reserve for an entry whose header declares `declared` bytes
fn initial_capacity(declared: u64) -> usize {
    declared.min(MAX_PREALLOC_BYTES) as usize
}

/// Extract the first `.CSV` entry of an export archive held in memory
pub fn extract_csv(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if !file.name().ends_with(".CSV") {
            continue;
        }

        info!("Extracting {} ...", file.name());
        let mut raw = Vec::with_capacity(initial_capacity(file.size()));
        file.read_to_end(&mut raw)?;
        return Ok(String::from_utf8_lossy(&raw).into_owned());
    }

    Err(FeedError::NoCsvInArchive)
}

/// HTTP client for the GDELT 2.0 update feed
pub struct GdeltClient {
    client: reqwest::Client,
    config: FeedConfig,
}

impl GdeltClient {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kodoku-gdelt-feed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    async fn get_once(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// GET with bounded retries and linear backoff
    async fn get_with_retry(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.get_once(url, timeout).await {
                Ok(body) => {
                    debug!("GET {} -> {} bytes", url, body.len());
                    return Ok(body);
                }
                Err(e) if attempt < max_attempts => {
                    let delay = Duration::from_secs(self.config.backoff_secs * attempt as u64);
                    warn!(
                        "GET {} failed (attempt {}/{}): {}; retrying in {:?}",
                        url, attempt, max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolve the most recent events export
    pub async fn latest_export(&self) -> Result<ExportRef> {
        info!("Fetching lastupdate.txt ...");
        let body = self
            .get_with_retry(
                &self.config.lastupdate_url,
                Duration::from_secs(self.config.index_timeout_secs),
            )
            .await?;

        let export = parse_lastupdate(&String::from_utf8_lossy(&body))?;
        info!("Found export URL: {}", export.url);
        Ok(export)
    }

    /// Download an export archive and return its CSV text
    pub async fn download_export(&self, export: &ExportRef) -> Result<String> {
        info!("Downloading {} ...", export.url);
        let archive = self
            .get_with_retry(
                &export.url,
                Duration::from_secs(self.config.download_timeout_secs),
            )
            .await?;
        extract_csv(&archive)
    }

    /// Resolve and download the latest export
    pub async fn fetch_latest(&self) -> Result<(ExportRef, String)> {
        let export = self.latest_export().await?;
        let text = self.download_export(&export).await?;
        Ok((export, text))
    }
}
