//! Per-sheet summaries, sheet comparison and the Sensor Reliability Index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{GroupStat, NumericColumn};

use super::derived::{column_values, DerivedMetricRow, DerivedTable};
use super::stats::{self, ColumnStats};

/// Sensor Reliability Index.
///
/// `1 - (std(A per unit) + std(B per unit) + |mean(delta)|) / 3`. Higher is
/// more stable. NaN when any term is NaN. The terms are not normalized, so
/// the index can go negative for large-magnitude metrics.
pub fn sri(std_a_per_unit: f64, std_b_per_unit: f64, mean_delta: f64) -> f64 {
    1.0 - (std_a_per_unit + std_b_per_unit + mean_delta.abs()) / 3.0
}

/// SRI over a set of rows.
pub fn sri_of(rows: &[&DerivedMetricRow]) -> f64 {
    sri(
        stats::std_dev(&column_values(rows, NumericColumn::MetricAPerUnit)),
        stats::std_dev(&column_values(rows, NumericColumn::MetricBPerUnit)),
        stats::mean(&column_values(rows, NumericColumn::Delta)),
    )
}

/// Describe every numeric column over a set of rows.
pub fn describe_rows(rows: &[&DerivedMetricRow]) -> BTreeMap<NumericColumn, ColumnStats> {
    NumericColumn::all()
        .iter()
        .map(|&c| (c, ColumnStats::describe(&column_values(rows, c))))
        .collect()
}

/// Missing-value counts of the raw numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissingCounts {
    pub quantity: usize,
    pub metric_a: usize,
    pub metric_b: usize,
}

impl MissingCounts {
    pub fn of(rows: &[&DerivedMetricRow]) -> Self {
        let m = |c: NumericColumn| stats::missing(&column_values(rows, c));
        Self {
            quantity: m(NumericColumn::Quantity),
            metric_a: m(NumericColumn::MetricA),
            metric_b: m(NumericColumn::MetricB),
        }
    }

    pub fn total(&self) -> usize {
        self.quantity + self.metric_a + self.metric_b
    }
}

/// Summary of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub rows: usize,
    /// Rows dropped at load time for lack of a timestamp.
    pub dropped_rows: usize,
    pub total_quantity: f64,
    pub columns: BTreeMap<NumericColumn, ColumnStats>,
    pub missing: MissingCounts,
    pub sri: f64,
}

impl SheetSummary {
    /// Summarize one sheet's rows; `dropped_rows` comes from normalization.
    pub fn build(sheet: &str, rows: &[&DerivedMetricRow], dropped_rows: usize) -> Self {
        Self {
            sheet: sheet.to_string(),
            rows: rows.len(),
            dropped_rows,
            total_quantity: stats::sum(&column_values(rows, NumericColumn::Quantity)),
            columns: describe_rows(rows),
            missing: MissingCounts::of(rows),
            sri: sri_of(rows),
        }
    }
}

/// Summaries of every sheet in the table, in selection order.
///
/// `dropped` maps sheet names to their dropped-row counts.
pub fn summarize_sheets(table: &DerivedTable, dropped: &BTreeMap<String, usize>) -> Vec<SheetSummary> {
    table
        .sheets
        .iter()
        .map(|sheet| {
            let rows = table.sheet_rows(sheet);
            SheetSummary::build(sheet, &rows, dropped.get(sheet).copied().unwrap_or(0))
        })
        .collect()
}

/// One group statistic per sheet and numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetComparison {
    pub stat: GroupStat,
    pub sheets: Vec<SheetStatRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetStatRow {
    pub sheet: String,
    pub values: BTreeMap<NumericColumn, f64>,
}

impl SheetComparison {
    pub fn build(table: &DerivedTable, stat: GroupStat) -> Self {
        let sheets = table
            .sheets
            .iter()
            .map(|sheet| {
                let rows = table.sheet_rows(sheet);
                SheetStatRow {
                    sheet: sheet.clone(),
                    values: NumericColumn::all()
                        .iter()
                        .map(|&c| (c, stats::group_stat(&column_values(&rows, c), stat)))
                        .collect(),
                }
            })
            .collect();
        Self { stat, sheets }
    }

    /// Value for one sheet and column.
    pub fn get(&self, sheet: &str, column: NumericColumn) -> Option<f64> {
        self.sheets
            .iter()
            .find(|s| s.sheet == sheet)
            .and_then(|s| s.values.get(&column).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlignmentMode, CombinedTable, NormalizedRow, TimeLabel};

    fn table(rows: &[(&str, f64, f64, f64)]) -> DerivedTable {
        let mut sheets: Vec<String> = Vec::new();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, (sheet, q, a, b))| {
                if !sheets.iter().any(|s| s == sheet) {
                    sheets.push(sheet.to_string());
                }
                NormalizedRow {
                    sheet: sheet.to_string(),
                    source_row: i,
                    label: TimeLabel::from_minutes(540 + i as i64),
                    instant: None,
                    quantity: *q,
                    metric_a: *a,
                    metric_b: *b,
                    date_label: String::new(),
                    sensor_type: String::new(),
                    time_key: String::new(),
                    elapsed_minutes: None,
                }
            })
            .collect();
        DerivedTable::from_combined(&CombinedTable {
            mode: AlignmentMode::SheetKeyed,
            sheets,
            rows,
        })
    }

    #[test]
    fn sri_formula() {
        assert_eq!(sri(0.0, 0.0, 0.0), 1.0);
        assert!((sri(0.3, 0.3, -0.3) - 0.7).abs() < 1e-12);
        assert!(sri(f64::NAN, 0.0, 0.0).is_nan());
    }

    #[test]
    fn sri_of_single_row_is_nan() {
        let t = table(&[("A", 5.0, 10.0, 8.0)]);
        assert!(sri_of(&t.all_rows()).is_nan());
    }

    #[test]
    fn sheet_summary_counts() {
        let t = table(&[
            ("A", 0.0, 0.0, 0.0),
            ("A", 5.0, 10.0, f64::NAN),
            ("A", 10.0, 20.0, 18.0),
            ("B", 4.0, 4.0, 4.0),
        ]);
        let summaries = summarize_sheets(&t, &BTreeMap::from([("A".to_string(), 2)]));
        assert_eq!(summaries.len(), 2);

        let a = &summaries[0];
        assert_eq!(a.rows, 3);
        assert_eq!(a.dropped_rows, 2);
        assert_eq!(a.total_quantity, 15.0);
        assert_eq!(a.missing, MissingCounts { quantity: 0, metric_a: 0, metric_b: 1 });
        assert_eq!(a.columns[&NumericColumn::MetricAPerUnit].count, 2);
        assert_eq!(summaries[1].dropped_rows, 0);
    }

    #[test]
    fn comparison_uses_chosen_stat() {
        let t = table(&[("A", 1.0, 1.0, 1.0), ("A", 3.0, 1.0, 1.0), ("B", 10.0, 1.0, 1.0)]);
        let max = SheetComparison::build(&t, GroupStat::Max);
        assert_eq!(max.get("A", NumericColumn::Quantity), Some(3.0));
        let mean = SheetComparison::build(&t, GroupStat::Mean);
        assert_eq!(mean.get("A", NumericColumn::Quantity), Some(2.0));
        assert_eq!(mean.get("B", NumericColumn::Quantity), Some(10.0));
        assert!(SheetComparison::build(&t, GroupStat::Std)
            .get("B", NumericColumn::Quantity)
            .is_some_and(f64::is_nan));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sri_decreases_in_each_term(
                a in 0.0_f64..100.0,
                b in 0.0_f64..100.0,
                d in -100.0_f64..100.0,
                step in 0.01_f64..10.0,
            ) {
                let base = sri(a, b, d);
                prop_assert!(sri(a + step, b, d) < base);
                prop_assert!(sri(a, b + step, d) < base);
                let further = if d >= 0.0 { d + step } else { d - step };
                prop_assert!(sri(a, b, further) < base);
            }
        }
    }
}
