//! Everything the leaderboard page shows for one view selection.

use leaderboard_core::error::{LeaderboardError, Result};
use leaderboard_core::formatting::format_percentage;
use leaderboard_core::models::{AttendanceDataset, HistorySeries, LeaderPoint};
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregator::AttendanceAggregator;

pub const RANK_LABEL: &str = "Rank";
pub const NAME_LABEL: &str = "Nama";

// ── ViewSelection ─────────────────────────────────────────────────────────────

/// Which ranking the table shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "month", rename_all = "lowercase")]
pub enum ViewSelection {
    Total,
    Monthly(String),
}

impl ViewSelection {
    /// Resolve a view name and optional month against the dataset.
    ///
    /// A monthly view without a month selects the first month of the
    /// payload, or an empty key when there are no months at all.
    pub fn resolve(dataset: &AttendanceDataset, view: &str, month: Option<&str>) -> Result<Self> {
        match view {
            "total" => Ok(ViewSelection::Total),
            "monthly" => {
                let month = month
                    .map(str::to_string)
                    .or_else(|| dataset.month_keys().first().map(|m| m.to_string()))
                    .unwrap_or_default();
                if dataset.month(&month).is_none() {
                    warn!("No attendance data for month {:?}", month);
                }
                Ok(ViewSelection::Monthly(month))
            }
            other => Err(LeaderboardError::Config(format!(
                "unknown view {:?} (expected \"total\" or \"monthly\")",
                other
            ))),
        }
    }

    fn is_total(&self) -> bool {
        matches!(self, ViewSelection::Total)
    }
}

// ── LeaderboardTable ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub name: String,
    pub attendance_count: u32,
    /// Percentage with two decimals and a `%` suffix.
    pub percentage_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardTable {
    pub title: String,
    pub count_label: String,
    pub percentage_label: String,
    pub rows: Vec<TableRow>,
}

impl LeaderboardTable {
    /// Column headers in display order.
    pub fn columns(&self) -> [&str; 4] {
        [
            RANK_LABEL,
            NAME_LABEL,
            self.count_label.as_str(),
            self.percentage_label.as_str(),
        ]
    }
}

/// Rank the selected view and label it for display.
pub fn build_table(dataset: &AttendanceDataset, selection: &ViewSelection) -> LeaderboardTable {
    let (title, scope) = match selection {
        ViewSelection::Total => ("Leaderboard Total".to_string(), "Total"),
        ViewSelection::Monthly(month) => (format!("Leaderboard Bulanan {}", month), "Bulanan"),
    };

    let rows: Vec<TableRow> = match selection {
        ViewSelection::Total => AttendanceAggregator::rank_total(dataset)
            .into_iter()
            .enumerate()
            .map(|(idx, row)| TableRow {
                rank: idx + 1,
                percentage_label: format_percentage(row.attendance_percentage),
                attendance_count: row.attendance_count,
                name: row.name,
            })
            .collect(),
        ViewSelection::Monthly(month) => AttendanceAggregator::rank_monthly(dataset, month)
            .into_iter()
            .enumerate()
            .map(|(idx, row)| TableRow {
                rank: idx + 1,
                percentage_label: format_percentage(row.percentage()),
                attendance_count: row.attendance_count,
                name: row.name,
            })
            .collect(),
    };

    LeaderboardTable {
        title,
        count_label: format!("Kehadiran {}", scope),
        percentage_label: format!("Persentase {}", scope),
        rows,
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Table plus both chart series for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub selection: ViewSelection,
    pub table: LeaderboardTable,
    /// Always taken from the total ranking.
    pub top_leader: Option<String>,
    pub history: Vec<HistorySeries>,
    pub leader_performance: Vec<LeaderPoint>,
    pub months: Vec<String>,
}

pub fn build_dashboard(dataset: &AttendanceDataset, selection: ViewSelection) -> Dashboard {
    let table = build_table(dataset, &selection);

    // Reuse the table ranking when it already is the total one.
    let top_leader = if selection.is_total() {
        table.rows.first().map(|row| row.name.clone())
    } else {
        let ranked = AttendanceAggregator::rank_total(dataset);
        AttendanceAggregator::select_top_leader(&ranked).map(str::to_string)
    };

    let history = AttendanceAggregator::top7_history(&dataset.monthly);
    let leader_performance =
        AttendanceAggregator::leader_performance(&dataset.monthly, top_leader.as_deref());

    debug!(
        "Dashboard: {} table rows, {} history series, {} leader points",
        table.rows.len(),
        history.len(),
        leader_performance.len()
    );

    Dashboard {
        selection,
        table,
        top_leader,
        history,
        leader_performance,
        months: months(dataset),
    }
}

/// Month keys in payload order, for a month selector.
pub fn months(dataset: &AttendanceDataset) -> Vec<String> {
    dataset
        .month_keys()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
