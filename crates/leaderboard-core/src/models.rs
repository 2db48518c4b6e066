use serde::{Deserialize, Serialize};

use crate::formatting::fraction_to_percentage;

/// A member's cumulative attendance, as listed in the total view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRow {
    /// Member name, unique within the total view.
    pub name: String,
    /// Number of sessions attended over all recorded time.
    pub attendance_count: u32,
    /// Cumulative attendance, already on a 0–100 scale.
    pub attendance_percentage: f64,
}

/// A member's attendance within one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    /// Member name, unique within its month.
    pub name: String,
    /// Number of sessions attended during the month.
    pub attendance_count: u32,
    /// Attendance ratio on a 0–1 scale.
    pub attendance_fraction: f64,
}

impl MonthlyRow {
    /// The attendance fraction rescaled to 0–100.
    pub fn percentage(&self) -> f64 {
        fraction_to_percentage(self.attendance_fraction)
    }
}

/// All rows recorded for a single month key such as `"06/2024"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSheet {
    pub month: String,
    pub rows: Vec<MonthlyRow>,
}

/// The complete attendance payload after validation.
///
/// `total` holds data rows only; the header row of the payload is kept apart
/// in `total_header`. `monthly` keeps months in payload order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDataset {
    /// Column labels from the first row of the total view.
    pub total_header: Vec<String>,
    pub total: Vec<TotalRow>,
    pub monthly: Vec<MonthSheet>,
}

impl AttendanceDataset {
    /// Rows for `month`, or `None` when the payload has no such month.
    pub fn month(&self, month: &str) -> Option<&[MonthlyRow]> {
        self.monthly
            .iter()
            .find(|sheet| sheet.month == month)
            .map(|sheet| sheet.rows.as_slice())
    }

    /// Month keys in payload order.
    pub fn month_keys(&self) -> Vec<&str> {
        self.monthly.iter().map(|sheet| sheet.month.as_str()).collect()
    }

    /// `true` when neither view has any data row.
    pub fn is_empty(&self) -> bool {
        self.total.is_empty() && self.monthly.iter().all(|sheet| sheet.rows.is_empty())
    }
}

/// One point of a top-performer trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub month: String,
    /// Monthly attendance on a 0–100 scale.
    pub percentage: f64,
}

/// The months in which one member ranked among the top performers.
///
/// Sparse: months outside the top are absent rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub name: String,
    pub points: Vec<HistoryPoint>,
}

/// One bar of the leader performance chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderPoint {
    pub month: String,
    /// Monthly attendance on a 0–100 scale, formatted with two decimals.
    pub percentage: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
