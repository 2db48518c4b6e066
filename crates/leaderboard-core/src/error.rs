use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the attendance leaderboard.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The payload is JSON but does not have the `{ total, monthly }` shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A row is missing a field or carries a field of the wrong type.
    ///
    /// `row` is the 0-based index in the raw array, header included.
    #[error("Malformed row {row} in {view} view: field `{field}` {reason}")]
    MalformedRow {
        view: String,
        row: usize,
        field: &'static str,
        reason: String,
    },

    /// The same member appears twice within one view.
    #[error("Duplicate name {name:?} in {view} view")]
    DuplicateName { view: String, name: String },

    /// The HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LeaderboardError {
    /// Whether asking the source again could succeed.
    ///
    /// Malformed data stays malformed, so only transport failures qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            LeaderboardError::FileRead { .. } | LeaderboardError::Http(_) => true,
            LeaderboardError::Io(_) => true,
            LeaderboardError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Convenience alias used throughout the leaderboard crates.
pub type Result<T> = std::result::Result<T, LeaderboardError>;
