//! Ranking and trend derivation over an attendance snapshot.
//!
//! Every operation borrows the dataset immutably and returns freshly
//! allocated results; the snapshot itself is never reordered.

use std::collections::HashMap;

use leaderboard_core::formatting::format_fixed;
use leaderboard_core::models::{
    AttendanceDataset, HistoryPoint, HistorySeries, LeaderPoint, MonthSheet, MonthlyRow, TotalRow,
};
use tracing::debug;

/// How many members per month feed the top-performer trend.
pub const TOP_HISTORY_SIZE: usize = 7;

// ── AttendanceAggregator ──────────────────────────────────────────────────────

/// Stateless helper deriving the leaderboard views.
pub struct AttendanceAggregator;

impl AttendanceAggregator {
    /// Rank the total view by attendance count, highest first.
    ///
    /// The sort is stable: members with equal counts keep their payload order.
    pub fn rank_total(dataset: &AttendanceDataset) -> Vec<TotalRow> {
        let mut ranked = dataset.total.clone();
        ranked.sort_by(|a, b| b.attendance_count.cmp(&a.attendance_count));
        ranked
    }

    /// Rank one month by attendance count, highest first.
    ///
    /// An unknown month yields an empty ranking.
    pub fn rank_monthly(dataset: &AttendanceDataset, month: &str) -> Vec<MonthlyRow> {
        let Some(rows) = dataset.month(month) else {
            debug!("rank_monthly: no data for month {:?}", month);
            return Vec::new();
        };

        let mut ranked = rows.to_vec();
        ranked.sort_by(|a, b| b.attendance_count.cmp(&a.attendance_count));
        ranked
    }

    /// Name of the first member of an already ranked total view.
    pub fn select_top_leader(ranked_total: &[TotalRow]) -> Option<&str> {
        ranked_total.first().map(|row| row.name.as_str())
    }

    /// Per-member trend of the top [`TOP_HISTORY_SIZE`] performers of each month.
    pub fn top7_history(monthly: &[MonthSheet]) -> Vec<HistorySeries> {
        Self::top_n_history(monthly, TOP_HISTORY_SIZE)
    }

    /// Per-member trend of the top `n` performers of each month.
    ///
    /// Months are ranked by attendance fraction. A member gets a point only
    /// for the months in which they made the cut, so series are sparse.
    /// Series appear in the order their member first made the cut.
    pub fn top_n_history(monthly: &[MonthSheet], n: usize) -> Vec<HistorySeries> {
        let mut series: Vec<HistorySeries> = Vec::new();
        let mut slots: HashMap<&str, usize> = HashMap::new();

        for sheet in monthly {
            let mut rows: Vec<&MonthlyRow> = sheet.rows.iter().collect();
            rows.sort_by(|a, b| b.attendance_fraction.total_cmp(&a.attendance_fraction));

            for row in rows.into_iter().take(n) {
                let slot = *slots.entry(row.name.as_str()).or_insert_with(|| {
                    series.push(HistorySeries {
                        name: row.name.clone(),
                        points: Vec::new(),
                    });
                    series.len() - 1
                });
                series[slot].points.push(HistoryPoint {
                    month: sheet.month.clone(),
                    percentage: row.percentage(),
                });
            }
        }

        debug!(
            "top_n_history: {} series over {} months (n = {})",
            series.len(),
            monthly.len(),
            n
        );
        series
    }

    /// Month-by-month percentage of `leader`, formatted with two decimals.
    ///
    /// Months without a row for the leader are skipped. No leader, or an
    /// empty name, yields an empty series.
    pub fn leader_performance(monthly: &[MonthSheet], leader: Option<&str>) -> Vec<LeaderPoint> {
        let Some(leader) = leader.filter(|name| !name.is_empty()) else {
            return Vec::new();
        };

        monthly
            .iter()
            .filter_map(|sheet| {
                sheet
                    .rows
                    .iter()
                    .find(|row| row.name == leader)
                    .map(|row| LeaderPoint {
                        month: sheet.month.clone(),
                        percentage: format_fixed(row.percentage(), 2),
                    })
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn total(name: &str, count: u32, percentage: f64) -> TotalRow {
        TotalRow {
            name: name.to_string(),
            attendance_count: count,
            attendance_percentage: percentage,
        }
    }

    fn monthly(name: &str, count: u32, fraction: f64) -> MonthlyRow {
        MonthlyRow {
            name: name.to_string(),
            attendance_count: count,
            attendance_fraction: fraction,
        }
    }

    fn sheet(month: &str, rows: Vec<MonthlyRow>) -> MonthSheet {
        MonthSheet {
            month: month.to_string(),
            rows,
        }
    }

    fn names_total(rows: &[TotalRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample_dataset() -> AttendanceDataset {
        AttendanceDataset {
            total_header: vec!["Nama".into(), "Kehadiran".into(), "Persentase".into()],
            total: vec![
                total("Carol", 6, 60.0),
                total("Alice", 10, 90.0),
                total("Bob", 8, 80.0),
            ],
            monthly: vec![
                sheet(
                    "01/2024",
                    vec![monthly("Bob", 3, 0.6), monthly("Alice", 4, 0.9)],
                ),
                sheet(
                    "02/2024",
                    vec![monthly("Alice", 3, 0.75), monthly("Carol", 5, 1.0)],
                ),
            ],
        }
    }

    // ── rank_total ────────────────────────────────────────────────────────────

    #[test]
    fn test_rank_total_sorts_descending_by_count() {
        let ranked = AttendanceAggregator::rank_total(&sample_dataset());
        assert_eq!(names_total(&ranked), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_rank_total_keeps_payload_order_on_ties() {
        let ds = AttendanceDataset {
            total: vec![
                total("Dewi", 5, 50.0),
                total("Eko", 7, 70.0),
                total("Budi", 5, 50.0),
                total("Ani", 5, 50.0),
            ],
            ..Default::default()
        };
        let ranked = AttendanceAggregator::rank_total(&ds);
        assert_eq!(names_total(&ranked), vec!["Eko", "Dewi", "Budi", "Ani"]);
    }

    #[test]
    fn test_rank_total_empty() {
        assert!(AttendanceAggregator::rank_total(&AttendanceDataset::default()).is_empty());
    }

    #[test]
    fn test_rank_total_does_not_reorder_input() {
        let ds = sample_dataset();
        let before = ds.clone();
        let first = AttendanceAggregator::rank_total(&ds);
        let second = AttendanceAggregator::rank_total(&ds);
        assert_eq!(ds, before);
        assert_eq!(first, second);
    }

    // ── rank_monthly ──────────────────────────────────────────────────────────

    #[test]
    fn test_rank_monthly_present_month() {
        let ranked = AttendanceAggregator::rank_monthly(&sample_dataset(), "02/2024");
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice"]);
    }

    #[test]
    fn test_rank_monthly_absent_month_is_empty() {
        assert!(AttendanceAggregator::rank_monthly(&sample_dataset(), "12/1999").is_empty());
    }

    // ── select_top_leader ─────────────────────────────────────────────────────

    #[test]
    fn test_select_top_leader() {
        let ranked = vec![total("Alice", 10, 90.0), total("Bob", 8, 80.0)];
        assert_eq!(AttendanceAggregator::select_top_leader(&ranked), Some("Alice"));
        assert_eq!(AttendanceAggregator::select_top_leader(&[]), None);
    }

    // ── top7_history ──────────────────────────────────────────────────────────

    #[test]
    fn test_top7_history_sparse_series() {
        // "Member 7" (eighth best) misses the cut in February.
        let january: Vec<MonthlyRow> = (0..3)
            .map(|i| monthly(&format!("Member {}", i), 1, 0.9 - i as f64 * 0.1))
            .chain(std::iter::once(monthly("Member 7", 1, 0.95)))
            .collect();
        let february: Vec<MonthlyRow> = (0..8)
            .map(|i| monthly(&format!("Member {}", i), 1, 0.9 - i as f64 * 0.1))
            .collect();
        let months = vec![sheet("01/2024", january), sheet("02/2024", february)];

        let history = AttendanceAggregator::top7_history(&months);
        let member7 = history
            .iter()
            .find(|s| s.name == "Member 7")
            .expect("Member 7 has a series");
        assert_eq!(member7.points.len(), 1);
        assert_eq!(member7.points[0].month, "01/2024");
        assert!((member7.points[0].percentage - 95.0).abs() < 1e-9);

        let member0 = history.iter().find(|s| s.name == "Member 0").unwrap();
        assert_eq!(member0.points.len(), 2);
    }

    #[test]
    fn test_top7_history_caps_each_month_at_seven() {
        let rows: Vec<MonthlyRow> = (0..10)
            .map(|i| monthly(&format!("M{}", i), 1, i as f64 / 10.0))
            .collect();
        let history = AttendanceAggregator::top7_history(&[sheet("03/2024", rows)]);

        assert_eq!(history.len(), TOP_HISTORY_SIZE);
        // Highest fraction first.
        assert_eq!(history[0].name, "M9");
        assert!(history.iter().all(|s| s.name != "M0" && s.name != "M1" && s.name != "M2"));
    }

    #[test]
    fn test_top7_history_orders_series_by_first_appearance() {
        let history = AttendanceAggregator::top7_history(&sample_dataset().monthly);
        let names: Vec<&str> = history.iter().map(|s| s.name.as_str()).collect();
        // January ranks Alice (0.9) over Bob (0.6); Carol first shows up in February.
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

        let alice = &history[0];
        let months: Vec<&str> = alice.points.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["01/2024", "02/2024"]);
        assert!((alice.points[1].percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_top7_history_small_and_empty_months() {
        let months = vec![
            sheet("01/2024", Vec::new()),
            sheet("02/2024", vec![monthly("Solo", 1, 0.5)]),
        ];
        let history = AttendanceAggregator::top7_history(&months);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].points.len(), 1);
        assert!(AttendanceAggregator::top7_history(&[]).is_empty());
    }

    #[test]
    fn test_top_n_history_zero_is_empty() {
        assert!(AttendanceAggregator::top_n_history(&sample_dataset().monthly, 0).is_empty());
    }

    // ── leader_performance ────────────────────────────────────────────────────

    #[test]
    fn test_leader_performance_formats_two_decimals() {
        let months = vec![
            sheet("01/2024", vec![monthly("Alice", 4, 0.9)]),
            sheet("02/2024", vec![monthly("Alice", 3, 0.75)]),
        ];
        let perf = AttendanceAggregator::leader_performance(&months, Some("Alice"));
        assert_eq!(
            perf,
            vec![
                LeaderPoint {
                    month: "01/2024".into(),
                    percentage: "90.00".into()
                },
                LeaderPoint {
                    month: "02/2024".into(),
                    percentage: "75.00".into()
                },
            ]
        );
    }

    #[test]
    fn test_leader_performance_skips_months_without_leader() {
        let perf = AttendanceAggregator::leader_performance(&sample_dataset().monthly, Some("Bob"));
        assert_eq!(perf.len(), 1);
        assert_eq!(perf[0].month, "01/2024");
        assert_eq!(perf[0].percentage, "60.00");
    }

    #[test]
    fn test_leader_performance_without_leader() {
        let months = sample_dataset().monthly;
        assert!(AttendanceAggregator::leader_performance(&months, None).is_empty());
        assert!(AttendanceAggregator::leader_performance(&months, Some("")).is_empty());
        assert!(AttendanceAggregator::leader_performance(&months, Some("Nobody")).is_empty());
    }

    #[test]
    fn test_leader_from_empty_total_degrades_to_empty_views() {
        let ds = AttendanceDataset {
            monthly: sample_dataset().monthly,
            ..Default::default()
        };
        let ranked = AttendanceAggregator::rank_total(&ds);
        let leader = AttendanceAggregator::select_top_leader(&ranked);
        assert!(leader.is_none());
        assert!(AttendanceAggregator::leader_performance(&ds.monthly, leader).is_empty());
    }

    // ── Properties ────────────────────────────────────────────────────────────

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_total_rows() -> impl Strategy<Value = Vec<TotalRow>> {
            prop::collection::vec((0u32..20, 0.0f64..=100.0), 0..40).prop_map(|cells| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, (count, pct))| total(&format!("member-{}", i), count, pct))
                    .collect()
            })
        }

        fn arb_month() -> impl Strategy<Value = Vec<MonthlyRow>> {
            prop::collection::vec((0u32..10, 0.0f64..=1.0), 0..15).prop_map(|cells| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(i, (count, frac))| monthly(&format!("member-{}", i), count, frac))
                    .collect()
            })
        }

        fn arb_monthly() -> impl Strategy<Value = Vec<MonthSheet>> {
            prop::collection::vec(arb_month(), 0..6).prop_map(|months| {
                months
                    .into_iter()
                    .enumerate()
                    .map(|(i, rows)| sheet(&format!("{:02}/2024", i + 1), rows))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn rank_total_is_sorted_stable_permutation(rows in arb_total_rows()) {
                let ds = AttendanceDataset { total: rows.clone(), ..Default::default() };
                let ranked = AttendanceAggregator::rank_total(&ds);

                prop_assert_eq!(ranked.len(), rows.len());
                for pair in ranked.windows(2) {
                    prop_assert!(pair[0].attendance_count >= pair[1].attendance_count);
                    if pair[0].attendance_count == pair[1].attendance_count {
                        let a = rows.iter().position(|r| r.name == pair[0].name).unwrap();
                        let b = rows.iter().position(|r| r.name == pair[1].name).unwrap();
                        prop_assert!(a < b);
                    }
                }
                let mut got: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
                let mut want: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
                got.sort_unstable();
                want.sort_unstable();
                prop_assert_eq!(got, want);
            }

            #[test]
            fn rank_monthly_is_sorted_for_every_month(months in arb_monthly()) {
                let ds = AttendanceDataset { monthly: months.clone(), ..Default::default() };
                for sheet in &months {
                    let ranked = AttendanceAggregator::rank_monthly(&ds, &sheet.month);
                    prop_assert_eq!(ranked.len(), sheet.rows.len());
                    for pair in ranked.windows(2) {
                        prop_assert!(pair[0].attendance_count >= pair[1].attendance_count);
                    }
                }
            }

            #[test]
            fn top7_history_respects_cut_and_sparsity(months in arb_monthly()) {
                let history = AttendanceAggregator::top7_history(&months);

                for sheet in &months {
                    let points = history
                        .iter()
                        .flat_map(|s| s.points.iter())
                        .filter(|p| p.month == sheet.month)
                        .count();
                    prop_assert_eq!(points, sheet.rows.len().min(TOP_HISTORY_SIZE));
                }
                for series in &history {
                    let mut seen: Vec<&str> = series.points.iter().map(|p| p.month.as_str()).collect();
                    let before = seen.len();
                    seen.dedup();
                    prop_assert_eq!(seen.len(), before);
                }
            }

            #[test]
            fn operations_are_idempotent(rows in arb_total_rows(), months in arb_monthly()) {
                let ds = AttendanceDataset { total: rows, monthly: months, ..Default::default() };
                let snapshot = ds.clone();

                let ranked = AttendanceAggregator::rank_total(&ds);
                prop_assert_eq!(&ranked, &AttendanceAggregator::rank_total(&ds));
                prop_assert_eq!(
                    AttendanceAggregator::top7_history(&ds.monthly),
                    AttendanceAggregator::top7_history(&ds.monthly)
                );
                let leader = AttendanceAggregator::select_top_leader(&ranked);
                prop_assert_eq!(
                    AttendanceAggregator::leader_performance(&ds.monthly, leader),
                    AttendanceAggregator::leader_performance(&ds.monthly, leader)
                );
                prop_assert_eq!(&ds, &snapshot);
            }
        }
    }
}
