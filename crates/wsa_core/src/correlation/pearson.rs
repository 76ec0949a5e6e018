//! Pearson correlation with pairwise-complete observations.

use serde::{Deserialize, Serialize};

use crate::metrics::{column_values, DerivedMetricRow, DerivedTable};
use crate::models::NumericColumn;

/// Pearson correlation of two series.
///
/// Positions where either value is missing are skipped. Longer input is
/// truncated to the shorter length. NaN with fewer than two complete pairs
/// or when either side is constant. The result is clamped to [-1, 1].
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(a, b)| (*a, *b))
        .collect();
    if pairs.len() < 2 || is_constant(pairs.iter().map(|p| p.0)) || is_constant(pairs.iter().map(|p| p.1)) {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (sxy, sxx, syy) = pairs.iter().fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (a, b)| {
        let (dx, dy) = (a - mx, b - my);
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });

    let r = sxy / (sxx * syy).sqrt();
    if r.is_nan() {
        f64::NAN
    } else {
        r.clamp(-1.0, 1.0)
    }
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Whether a column has at least two values and is not constant.
fn is_informative(values: &[f64]) -> bool {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    present.len() >= 2 && !is_constant(present.into_iter())
}

/// Square correlation matrix over a set of numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    /// Row-major values; `values[i][j]` correlates `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of columns over the given rows.
    ///
    /// The diagonal is exactly 1.0 for informative columns and NaN for
    /// constant or near-empty ones.
    pub fn compute(rows: &[&DerivedMetricRow], columns: &[NumericColumn]) -> Self {
        let data: Vec<Vec<f64>> = columns.iter().map(|&c| column_values(rows, c)).collect();
        let k = columns.len();
        let mut values = vec![vec![f64::NAN; k]; k];
        for i in 0..k {
            values[i][i] = if is_informative(&data[i]) { 1.0 } else { f64::NAN };
            for j in (i + 1)..k {
                let r = pearson(&data[i], &data[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self {
            columns: columns.to_vec(),
            values,
        }
    }

    /// Matrix over the whole table.
    pub fn for_table(table: &DerivedTable, columns: &[NumericColumn]) -> Self {
        Self::compute(&table.all_rows(), columns)
    }

    /// Correlation between two columns, if both are in the matrix.
    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        Some(self.values[i][j])
    }

    /// Symmetry check (NaN matches NaN).
    pub fn is_symmetric(&self) -> bool {
        let k = self.columns.len();
        (0..k).all(|i| {
            (0..k).all(|j| {
                let (a, b) = (self.values[i][j], self.values[j][i]);
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }
}

/// Correlation matrix of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetCorrelation {
    pub sheet: String,
    pub matrix: CorrelationMatrix,
}

/// One matrix per sheet, in selection order.
pub fn per_sheet_matrices(table: &DerivedTable, columns: &[NumericColumn]) -> Vec<SheetCorrelation> {
    table
        .sheets
        .iter()
        .map(|sheet| SheetCorrelation {
            sheet: sheet.clone(),
            matrix: CorrelationMatrix::compute(&table.sheet_rows(sheet), columns),
        })
        .collect()
}
