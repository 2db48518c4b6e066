//! Fetch-once data manager for the attendance dataset.
//!
//! Wraps a [`DatasetSource`] with an explicit load state and retry logic.
//! Callers use [`DataManager::load`] to obtain the shared snapshot; the first
//! successful load is kept for the rest of the session and never re-fetched.
//! Transport failures are retried with linear back-off (0 ms → 100 ms →
//! 200 ms). Malformed payloads fail immediately.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use leaderboard_core::error::Result;
use leaderboard_core::models::AttendanceDataset;

use crate::source::DatasetSource;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Default number of fetch attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Back-off step between attempts.
const BACKOFF_STEP_MS: u64 = 100;

// ── Snapshot & state ──────────────────────────────────────────────────────────

/// The validated dataset together with the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSnapshot {
    pub dataset: AttendanceDataset,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Ready(Arc<DatasetSnapshot>),
    /// The last load gave up; holds the error description.
    Failed(String),
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Loads the dataset once and hands out the shared snapshot.
///
/// # Example
/// ```no_run
/// use leaderboard_runtime::data_manager::DataManager;
/// use leaderboard_runtime::source::DatasetSource;
///
/// # async fn run() -> leaderboard_core::error::Result<()> {
/// let source = DatasetSource::parse("attendance.json")?;
/// let mut mgr = DataManager::new(source, 3);
/// let snapshot = mgr.load().await?;
/// println!("{} members", snapshot.dataset.total.len());
/// # Ok(())
/// # }
/// ```
pub struct DataManager {
    source: DatasetSource,
    max_attempts: u32,
    state: LoadState,
}

impl DataManager {
    /// `max_attempts` is clamped to at least one.
    pub fn new(source: DatasetSource, max_attempts: u32) -> Self {
        Self {
            source,
            max_attempts: max_attempts.max(1),
            state: LoadState::Idle,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the snapshot, fetching it first if this manager is not ready.
    ///
    /// A failed manager tries again on the next call.
    pub async fn load(&mut self) -> Result<Arc<DatasetSnapshot>> {
        if let LoadState::Ready(snapshot) = &self.state {
            tracing::debug!("returning loaded snapshot");
            return Ok(Arc::clone(snapshot));
        }

        match self.fetch_with_retry().await {
            Ok(dataset) => {
                tracing::info!(
                    members = dataset.total.len(),
                    months = dataset.monthly.len(),
                    "attendance dataset loaded from {}",
                    self.source
                );
                let snapshot = Arc::new(DatasetSnapshot {
                    dataset,
                    fetched_at: Utc::now(),
                });
                self.state = LoadState::Ready(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "giving up on {}", self.source);
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Loaded snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<DatasetSnapshot>> {
        match &self.state {
            LoadState::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Description of the error that failed the last load, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Back-off schedule: attempt 1 → 0 ms, attempt 2 → 100 ms, attempt 3 → 200 ms.
    async fn fetch_with_retry(&self) -> Result<AttendanceDataset> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let sleep_ms = u64::from(attempt) * BACKOFF_STEP_MS;
                tracing::debug!(attempt, sleep_ms, "retrying fetch after back-off");
                tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            }
            attempt += 1;

            match self.source.fetch().await {
                Ok(dataset) => return Ok(dataset),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(attempt, error = %e, "fetch attempt failed");
                }
                Err(e) => {
                    tracing::debug!(attempt, retryable = e.is_retryable(), "fetch stopped");
                    return Err(e);
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
