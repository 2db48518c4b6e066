//! Plain-text rendering of the dashboard for terminal output.

use leaderboard_core::formatting::format_percentage;
use leaderboard_data::dashboard::{Dashboard, LeaderboardTable};
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";

const LEADER_HEADING: &str = "Top Monthly Leader Performance (%):";
const HISTORY_HEADING: &str = "Overall Scores (%)";

// ── Table ─────────────────────────────────────────────────────────────────────

/// Pad `text` to `width` display columns. Numbers are right-aligned.
fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if right_align {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

/// Render the leaderboard table with aligned columns.
///
/// Widths are measured in terminal columns, so names with wide characters
/// still line up.
pub fn render_table(table: &LeaderboardTable) -> String {
    let header = table.columns();
    let cells: Vec<[String; 4]> = table
        .rows
        .iter()
        .map(|row| {
            [
                row.rank.to_string(),
                row.name.clone(),
                row.attendance_count.to_string(),
                row.percentage_label.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.width());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }
    // Rank, count and percentage are numeric.
    let right_align = [true, false, true, true];

    let render_line = |columns: [&str; 4]| -> String {
        columns
            .iter()
            .enumerate()
            .map(|(i, text)| pad(text, widths[i], right_align[i]))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&table.title);
    out.push('\n');
    out.push_str(&render_line(header));
    out.push('\n');
    let rule_width: usize = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);
    out.push_str(&"─".repeat(rule_width));
    out.push('\n');

    if cells.is_empty() {
        out.push_str("(no data)\n");
    }
    for row in &cells {
        let columns = [
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ];
        out.push_str(&render_line(columns));
        out.push('\n');
    }
    out
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

/// Render table, leader performance and top-7 history as one text report.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = render_table(&dashboard.table);

    out.push('\n');
    match &dashboard.top_leader {
        Some(leader) => {
            out.push_str(&format!("{} {}\n", LEADER_HEADING, leader));
            if dashboard.leader_performance.is_empty() {
                out.push_str("  (no monthly data)\n");
            }
            let month_width = dashboard
                .leader_performance
                .iter()
                .map(|p| p.month.width())
                .max()
                .unwrap_or(0);
            for point in &dashboard.leader_performance {
                out.push_str(&format!(
                    "  {}  {:>6}%\n",
                    pad(&point.month, month_width, false),
                    point.percentage
                ));
            }
        }
        None => out.push_str(&format!("{} -\n", LEADER_HEADING)),
    }

    out.push('\n');
    out.push_str(HISTORY_HEADING);
    out.push('\n');
    if dashboard.history.is_empty() {
        out.push_str("  (no monthly data)\n");
    }
    let name_width = dashboard
        .history
        .iter()
        .map(|s| s.name.width())
        .max()
        .unwrap_or(0);
    for series in &dashboard.history {
        let points: Vec<String> = series
            .points
            .iter()
            .map(|p| format!("{} {}", p.month, format_percentage(p.percentage)))
            .collect();
        out.push_str(&format!(
            "  {}  {}\n",
            pad(&series.name, name_width, false),
            points.join(", ")
        ));
    }

    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
