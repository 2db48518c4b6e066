//! Payload loading and validation for the attendance leaderboard.
//!
//! Turns the `{ total, monthly }` JSON document served by the attendance
//! spreadsheet into a typed [`AttendanceDataset`]. Every row is checked here,
//! so the aggregation layer only ever sees well-formed data.

use std::collections::HashSet;
use std::path::Path;

use leaderboard_core::error::{LeaderboardError, Result};
use leaderboard_core::models::{AttendanceDataset, MonthSheet, MonthlyRow, TotalRow};
use serde_json::Value;
use tracing::debug;

/// View label used in error messages for the total sheet.
pub const TOTAL_VIEW: &str = "total";

// Column positions shared by both row shapes.
const NAME_COLUMN: usize = 0;
const COUNT_COLUMN: usize = 1;
const RATIO_COLUMN: usize = 2;

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and validate a dataset stored as a JSON file.
pub fn load_dataset_file(path: &Path) -> Result<AttendanceDataset> {
    let content = std::fs::read_to_string(path).map_err(|source| LeaderboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_dataset_str(&content)
}

/// Parse and validate a dataset from JSON text.
pub fn parse_dataset_str(content: &str) -> Result<AttendanceDataset> {
    let value: Value = serde_json::from_str(content)?;
    parse_dataset(&value)
}

/// Validate an already-decoded payload.
///
/// The first row of `total` is the header and is kept apart from the data
/// rows. Month keys keep their payload order.
pub fn parse_dataset(value: &Value) -> Result<AttendanceDataset> {
    let object = value.as_object().ok_or_else(|| {
        LeaderboardError::MalformedPayload(
            "expected a JSON object with `total` and `monthly`".to_string(),
        )
    })?;

    let total_raw = object
        .get("total")
        .ok_or_else(|| LeaderboardError::MalformedPayload("missing `total`".to_string()))?
        .as_array()
        .ok_or_else(|| LeaderboardError::MalformedPayload("`total` is not an array".to_string()))?;

    let monthly_raw = object
        .get("monthly")
        .ok_or_else(|| LeaderboardError::MalformedPayload("missing `monthly`".to_string()))?
        .as_object()
        .ok_or_else(|| {
            LeaderboardError::MalformedPayload("`monthly` is not an object".to_string())
        })?;

    let (total_header, total) = match total_raw.split_first() {
        Some((header, rows)) => (parse_header(header)?, parse_total_rows(rows)?),
        None => (Vec::new(), Vec::new()),
    };

    let mut monthly = Vec::with_capacity(monthly_raw.len());
    for (month, rows) in monthly_raw {
        let rows = rows.as_array().ok_or_else(|| {
            LeaderboardError::MalformedPayload(format!("month {:?} is not an array", month))
        })?;
        monthly.push(MonthSheet {
            month: month.clone(),
            rows: parse_monthly_rows(month, rows)?,
        });
    }

    debug!(
        "Parsed attendance payload: {} total rows, {} months",
        total.len(),
        monthly.len()
    );

    Ok(AttendanceDataset {
        total_header,
        total,
        monthly,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn parse_header(header: &Value) -> Result<Vec<String>> {
    let cells = row_cells(TOTAL_VIEW, 0, header)?;
    Ok(cells
        .iter()
        .map(|cell| match cell {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect())
}

fn parse_total_rows(rows: &[Value]) -> Result<Vec<TotalRow>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut parsed = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        // Offset by one: the header occupies raw index 0.
        let cells = RowCells::new(TOTAL_VIEW, idx + 1, row)?;
        let name = cells.name()?;
        ensure_unique(&mut seen, TOTAL_VIEW, &name)?;
        parsed.push(TotalRow {
            attendance_count: cells.count()?,
            attendance_percentage: cells.ratio("attendance_percentage")?,
            name,
        });
    }

    Ok(parsed)
}

fn parse_monthly_rows(month: &str, rows: &[Value]) -> Result<Vec<MonthlyRow>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut parsed = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let cells = RowCells::new(month, idx, row)?;
        let name = cells.name()?;
        ensure_unique(&mut seen, month, &name)?;
        parsed.push(MonthlyRow {
            attendance_count: cells.count()?,
            attendance_fraction: cells.ratio("attendance_fraction")?,
            name,
        });
    }

    debug!("Month {}: {} rows", month, parsed.len());
    Ok(parsed)
}

fn ensure_unique(seen: &mut HashSet<String>, view: &str, name: &str) -> Result<()> {
    if seen.insert(name.to_string()) {
        Ok(())
    } else {
        Err(LeaderboardError::DuplicateName {
            view: view.to_string(),
            name: name.to_string(),
        })
    }
}

fn row_cells<'a>(view: &str, row: usize, value: &'a Value) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(view, row, "row", "is not an array".to_string()))
}

fn malformed(view: &str, row: usize, field: &'static str, reason: String) -> LeaderboardError {
    LeaderboardError::MalformedRow {
        view: view.to_string(),
        row,
        field,
        reason,
    }
}

/// One raw row plus the coordinates needed to report problems with it.
struct RowCells<'a> {
    view: &'a str,
    row: usize,
    cells: &'a [Value],
}

impl<'a> RowCells<'a> {
    fn new(view: &'a str, row: usize, value: &'a Value) -> Result<Self> {
        Ok(Self {
            view,
            row,
            cells: row_cells(view, row, value)?,
        })
    }

    fn cell(&self, column: usize, field: &'static str) -> Result<&'a Value> {
        self.cells
            .get(column)
            .ok_or_else(|| malformed(self.view, self.row, field, "is missing".to_string()))
    }

    fn name(&self) -> Result<String> {
        match self.cell(NAME_COLUMN, "name")? {
            Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
            Value::String(_) => Err(malformed(
                self.view,
                self.row,
                "name",
                "is empty".to_string(),
            )),
            other => Err(malformed(
                self.view,
                self.row,
                "name",
                format!("must be a string, got {}", other),
            )),
        }
    }

    fn count(&self) -> Result<u32> {
        let field = "attendance_count";
        let value = self.cell(COUNT_COLUMN, field)?;
        let Value::Number(number) = value else {
            return Err(malformed(
                self.view,
                self.row,
                field,
                format!("must be a number, got {}", value),
            ));
        };

        let whole = match (number.as_u64(), number.as_f64()) {
            (Some(n), _) => Some(n),
            (None, Some(f)) if f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
            _ => None,
        };

        whole
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                malformed(
                    self.view,
                    self.row,
                    field,
                    format!("must be a non-negative integer, got {}", number),
                )
            })
    }

    fn ratio(&self, field: &'static str) -> Result<f64> {
        let value = self.cell(RATIO_COLUMN, field)?;
        value.as_f64().ok_or_else(|| {
            malformed(
                self.view,
                self.row,
                field,
                format!("must be a number, got {}", value),
            )
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
