//! Derived per-row columns.

use serde::{Deserialize, Serialize};

use crate::models::{AlignmentMode, CombinedTable, NormalizedRow, NumericColumn};

/// Metric per produced unit. Zero or missing quantity gives NaN, never infinity.
pub fn per_unit(metric: f64, quantity: f64) -> f64 {
    if quantity == 0.0 || quantity.is_nan() {
        f64::NAN
    } else {
        metric / quantity
    }
}

/// Difference between the two metrics; NaN when either is missing.
pub fn delta(metric_a: f64, metric_b: f64) -> f64 {
    metric_a - metric_b
}

/// A normalized row with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetricRow {
    #[serde(flatten)]
    pub row: NormalizedRow,
    pub metric_a_per_unit: f64,
    pub metric_b_per_unit: f64,
    pub delta: f64,
}

impl DerivedMetricRow {
    /// Per-unit values are NaN when the quantity is zero or missing.
    pub fn from_row(row: NormalizedRow) -> Self {
        Self {
            metric_a_per_unit: per_unit(row.metric_a, row.quantity),
            metric_b_per_unit: per_unit(row.metric_b, row.quantity),
            delta: delta(row.metric_a, row.metric_b),
            row,
        }
    }

    /// Value of one numeric column.
    pub fn value(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::Quantity => self.row.quantity,
            NumericColumn::MetricA => self.row.metric_a,
            NumericColumn::MetricB => self.row.metric_b,
            NumericColumn::Delta => self.delta,
            NumericColumn::MetricAPerUnit => self.metric_a_per_unit,
            NumericColumn::MetricBPerUnit => self.metric_b_per_unit,
        }
    }
}

/// Extract one column from a set of rows.
pub fn column_values(rows: &[&DerivedMetricRow], column: NumericColumn) -> Vec<f64> {
    rows.iter().map(|r| r.value(column)).collect()
}

/// The combined table with derived columns, in the same row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTable {
    pub mode: AlignmentMode,
    pub sheets: Vec<String>,
    pub rows: Vec<DerivedMetricRow>,
}

impl DerivedTable {
    /// Derive every row of the combined table, keeping its order.
    pub fn from_combined(table: &CombinedTable) -> Self {
        Self {
            mode: table.mode,
            sheets: table.sheets.clone(),
            rows: table.rows.iter().cloned().map(DerivedMetricRow::from_row).collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row, in table order.
    pub fn all_rows(&self) -> Vec<&DerivedMetricRow> {
        self.rows.iter().collect()
    }

    /// Rows of one sheet, in table order.
    pub fn sheet_rows(&self, sheet: &str) -> Vec<&DerivedMetricRow> {
        self.rows.iter().filter(|r| r.row.sheet == sheet).collect()
    }

    /// One column over the whole table.
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeLabel;

    fn row(quantity: f64, a: f64, b: f64) -> NormalizedRow {
        NormalizedRow {
            sheet: "s".into(),
            source_row: 0,
            label: TimeLabel::from_minutes(540),
            instant: None,
            quantity,
            metric_a: a,
            metric_b: b,
            date_label: "s".into(),
            sensor_type: "s".into(),
            time_key: "s_09:00".into(),
            elapsed_minutes: Some(0.0),
        }
    }

    #[test]
    fn per_unit_never_divides_by_zero() {
        assert!(per_unit(10.0, 0.0).is_nan());
        assert!(per_unit(10.0, f64::NAN).is_nan());
        assert!(per_unit(f64::NAN, 2.0).is_nan());
        assert_eq!(per_unit(10.0, 4.0), 2.5);
    }

    #[test]
    fn derived_row_columns() {
        let r = DerivedMetricRow::from_row(row(5.0, 10.0, 8.0));
        assert_eq!(r.value(NumericColumn::MetricAPerUnit), 2.0);
        assert_eq!(r.value(NumericColumn::MetricBPerUnit), 1.6);
        assert_eq!(r.value(NumericColumn::Delta), 2.0);
        assert_eq!(r.value(NumericColumn::Quantity), 5.0);
    }

    #[test]
    fn delta_propagates_missing() {
        let r = DerivedMetricRow::from_row(row(5.0, f64::NAN, 8.0));
        assert!(r.delta.is_nan());
    }

    #[test]
    fn all_zero_quantity_gives_no_ratios() {
        let combined = CombinedTable {
            mode: AlignmentMode::SheetKeyed,
            sheets: vec!["s".into()],
            rows: vec![row(0.0, 1.0, 2.0), row(0.0, 3.0, 4.0)],
        };
        let table = DerivedTable::from_combined(&combined);
        assert!(table.column(NumericColumn::MetricAPerUnit).iter().all(|v| v.is_nan()));
        assert!(table.column(NumericColumn::MetricBPerUnit).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn flattened_row_serializes_nan_as_null() {
        let r = DerivedMetricRow::from_row(row(0.0, 1.0, 2.0));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["sheet"], "s");
        assert!(json["metric_a_per_unit"].is_null());
        assert_eq!(json["delta"], -1.0);
    }
}
