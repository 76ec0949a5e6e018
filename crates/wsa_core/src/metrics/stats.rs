//! NaN-skipping descriptive statistics.
//!
//! Missing values are NaN and are skipped by every aggregate. An aggregate
//! over no values is NaN, never zero.
//!
//! Standard deviation is the sample form (n - 1 denominator) and quantiles
//! interpolate linearly between the two nearest ranks.

use serde::{Deserialize, Serialize};

use crate::models::GroupStat;

/// Values that are not missing.
fn present(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Number of non-missing values.
pub fn count(values: &[f64]) -> usize {
    present(values).count()
}

/// Number of missing values.
pub fn missing(values: &[f64]) -> usize {
    values.len() - count(values)
}

/// Sum of the present values; NaN when there are none.
pub fn sum(values: &[f64]) -> f64 {
    let mut n = 0usize;
    let total: f64 = present(values).inspect(|_| n += 1).sum();
    if n == 0 {
        f64::NAN
    } else {
        total
    }
}

/// Arithmetic mean of the present values.
pub fn mean(values: &[f64]) -> f64 {
    let n = count(values);
    if n == 0 {
        return f64::NAN;
    }
    present(values).sum::<f64>() / n as f64
}

/// Sample standard deviation (n - 1); NaN below two values.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = count(values);
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = present(values).map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Smallest present value.
pub fn min(values: &[f64]) -> f64 {
    present(values).fold(f64::NAN, f64::min)
}

/// Largest present value.
pub fn max(values: &[f64]) -> f64 {
    present(values).fold(f64::NAN, f64::max)
}

/// Linear-interpolated quantile, `q` in [0, 1].
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = present(values).collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// `sorted` must be non-empty, NaN-free and ascending.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let mut pos = q * (sorted.len() - 1) as f64;
    // Snap positions like 2/3 * 6 onto the exact index
    if (pos - pos.round()).abs() < 1e-9 {
        pos = pos.round();
    }
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Apply one of the sheet-comparison statistics.
pub fn group_stat(values: &[f64], stat: GroupStat) -> f64 {
    match stat {
        GroupStat::Mean => mean(values),
        GroupStat::Std => std_dev(values),
        GroupStat::Min => min(values),
        GroupStat::Max => max(values),
    }
}

/// Summary of one numeric column.
///
/// Serialized with NaN as `null`, so an empty column reaches the report as
/// `count: 0` and nulls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    /// Present (non-NaN) values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN below two values.
    pub std: f64,
    pub min: f64,
    /// First quartile.
    pub p25: f64,
    pub median: f64,
    /// Third quartile.
    pub p75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Describe a column. An all-missing column has count 0 and NaN elsewhere.
    pub fn describe(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = present(values).collect();
        sorted.sort_by(f64::total_cmp);
        let q = |p: f64| {
            if sorted.is_empty() {
                f64::NAN
            } else {
                quantile_sorted(&sorted, p)
            }
        };

        Self {
            count: sorted.len(),
            mean: mean(values),
            std: std_dev(values),
            min: q(0.0),
            p25: q(0.25),
            median: q(0.5),
            p75: q(0.75),
            max: q(1.0),
        }
    }
}
