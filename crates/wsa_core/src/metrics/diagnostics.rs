//! Diagnostic metrics per group of rows.
//!
//! All functions are pure. Undefined ratios are NaN.

use serde::{Deserialize, Serialize};

use crate::models::NumericColumn;

use super::derived::{column_values, DerivedMetricRow, DerivedTable};
use super::stats;

/// Diagnostic metrics for one group (all rows, or one sheet).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMetrics {
    /// `sum(metric A) / sum(quantity)`.
    pub energy_per_unit_a: f64,
    /// `sum(metric B) / sum(quantity)`.
    pub energy_per_unit_b: f64,
    /// Switches between producing and idle rows, per row.
    pub transition_rate: f64,
    /// Coefficient of variation of metric A per unit.
    pub dispersion_a: f64,
    /// Coefficient of variation of metric B per unit.
    pub dispersion_b: f64,
}

impl DiagnosticMetrics {
    /// Metrics over one set of rows. Undefined values are NaN.
    pub fn compute(rows: &[&DerivedMetricRow]) -> Self {
        let quantity = column_values(rows, NumericColumn::Quantity);
        let total_quantity = stats::sum(&quantity);
        let energy = |c: NumericColumn| ratio(stats::sum(&column_values(rows, c)), total_quantity);
        let dispersion = |c: NumericColumn| {
            let per_unit = column_values(rows, c);
            ratio(stats::std_dev(&per_unit), stats::mean(&per_unit))
        };

        Self {
            energy_per_unit_a: energy(NumericColumn::MetricA),
            energy_per_unit_b: energy(NumericColumn::MetricB),
            transition_rate: transition_rate(&quantity),
            dispersion_a: dispersion(NumericColumn::MetricAPerUnit),
            dispersion_b: dispersion(NumericColumn::MetricBPerUnit),
        }
    }

    fn to_array(self) -> [f64; 5] {
        [
            self.energy_per_unit_a,
            self.energy_per_unit_b,
            self.transition_rate,
            self.dispersion_a,
            self.dispersion_b,
        ]
    }

    fn from_array(v: [f64; 5]) -> Self {
        Self {
            energy_per_unit_a: v[0],
            energy_per_unit_b: v[1],
            transition_rate: v[2],
            dispersion_a: v[3],
            dispersion_b: v[4],
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || denominator.is_nan() {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Sign changes of the `quantity > 0` indicator divided by the row count.
///
/// Missing quantity counts as idle.
pub fn transition_rate(quantity: &[f64]) -> f64 {
    if quantity.is_empty() {
        return f64::NAN;
    }
    let changes = quantity
        .windows(2)
        .filter(|w| (w[0] > 0.0) != (w[1] > 0.0))
        .count();
    changes as f64 / quantity.len() as f64
}

/// Diagnostics of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetDiagnostics {
    pub sheet: String,
    pub metrics: DiagnosticMetrics,
}

/// Global, per-sheet and relative diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub global: DiagnosticMetrics,
    pub per_sheet: Vec<SheetDiagnostics>,
    /// Each sheet divided by the across-sheet mean (1.0 = average sheet).
    pub relative: Vec<SheetDiagnostics>,
}

impl DiagnosticsReport {
    /// One entry per sheet, in table order, plus the global entry.
    pub fn build(table: &DerivedTable) -> Self {
        let per_sheet: Vec<SheetDiagnostics> = table
            .sheets
            .iter()
            .map(|sheet| SheetDiagnostics {
                sheet: sheet.clone(),
                metrics: DiagnosticMetrics::compute(&table.sheet_rows(sheet)),
            })
            .collect();

        Self {
            global: DiagnosticMetrics::compute(&table.all_rows()),
            relative: relative_to_mean(&per_sheet),
            per_sheet,
        }
    }
}

/// Divide each sheet's metrics by the mean of that metric across sheets.
///
/// A zero or missing mean gives NaN for that metric.
pub fn relative_to_mean(per_sheet: &[SheetDiagnostics]) -> Vec<SheetDiagnostics> {
    let arrays: Vec<[f64; 5]> = per_sheet.iter().map(|s| s.metrics.to_array()).collect();
    let means: [f64; 5] = std::array::from_fn(|k| {
        let column: Vec<f64> = arrays.iter().map(|a| a[k]).collect();
        stats::mean(&column)
    });

    per_sheet
        .iter()
        .zip(&arrays)
        .map(|(s, a)| SheetDiagnostics {
            sheet: s.sheet.clone(),
            metrics: DiagnosticMetrics::from_array(std::array::from_fn(|k| ratio(a[k], means[k]))),
        })
        .collect()
}
