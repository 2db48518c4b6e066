//! Where the attendance payload comes from.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use leaderboard_core::error::{LeaderboardError, Result};
use leaderboard_core::models::AttendanceDataset;
use leaderboard_data::reader::parse_dataset_str;
use reqwest::Url;
use tracing::debug;

/// Query flag the spreadsheet endpoint expects on read requests.
const ACTION_PARAM: (&str, &str) = ("action", "get");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── DatasetSource ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A local JSON file with the same shape as the endpoint response.
    File(PathBuf),
    /// A spreadsheet-backed endpoint; `url` already carries `action=get`.
    Http { url: Url },
}

impl DatasetSource {
    /// `http://` and `https://` locations are endpoints, anything else a file path.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(LeaderboardError::Config(
                "dataset source must not be empty".to_string(),
            ));
        }

        let lower = location.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Ok(DatasetSource::File(PathBuf::from(location)));
        }

        let mut url = Url::parse(location)
            .map_err(|e| LeaderboardError::Config(format!("invalid URL {:?}: {}", location, e)))?;
        let (key, value) = ACTION_PARAM;
        let has_action = url.query_pairs().any(|(k, v)| k == key && v == value);
        if !has_action {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(DatasetSource::Http { url })
    }

    /// Fetch and validate the payload.
    pub async fn fetch(&self) -> Result<AttendanceDataset> {
        let body = match self {
            DatasetSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|source| {
                LeaderboardError::FileRead {
                    path: path.clone(),
                    source,
                }
            })?,
            DatasetSource::Http { url } => fetch_body(url).await?,
        };

        debug!("Fetched {} bytes from {}", body.len(), self);
        parse_dataset_str(&body)
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Http { url } => write!(f, "{}", url),
        }
    }
}

async fn fetch_body(url: &Url) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| LeaderboardError::Http(e.to_string()))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| LeaderboardError::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LeaderboardError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| LeaderboardError::Http(format!("failed to read body: {}", e)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
