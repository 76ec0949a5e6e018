//! Rolling means and first differences, applied within each sheet.

use crate::models::NumericColumn;

use super::derived::DerivedTable;

/// Trailing rolling mean with partial windows.
///
/// Early positions average over the values seen so far. Missing values in a
/// window are skipped; a window with no value gives NaN. A width of 1 is the
/// identity.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let (sum, n) = values[start..=i]
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n == 0 {
                f64::NAN
            } else {
                sum / n as f64
            }
        })
        .collect()
}

/// Difference to the previous value; the first position is NaN.
pub fn first_difference(values: &[f64]) -> Vec<f64> {
    std::iter::once(f64::NAN)
        .chain(values.windows(2).map(|w| w[1] - w[0]))
        .take(values.len())
        .collect()
}

/// Apply a series transform to each sheet's slice of a column separately.
///
/// The result is indexed like the table's rows.
fn per_sheet(
    table: &DerivedTable,
    column: NumericColumn,
    transform: impl Fn(&[f64]) -> Vec<f64>,
) -> Vec<f64> {
    let mut out = vec![f64::NAN; table.len()];
    for sheet in &table.sheets {
        let indices: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| &r.row.sheet == sheet)
            .map(|(i, _)| i)
            .collect();
        let series: Vec<f64> = indices.iter().map(|&i| table.rows[i].value(column)).collect();
        for (i, v) in indices.into_iter().zip(transform(&series)) {
            out[i] = v;
        }
    }
    out
}

/// Rolling mean of a column, restarting at every sheet.
pub fn rolling_by_sheet(table: &DerivedTable, column: NumericColumn, window: usize) -> Vec<f64> {
    per_sheet(table, column, |s| rolling_mean(s, window))
}

/// First difference of a column, restarting at every sheet.
pub fn difference_by_sheet(table: &DerivedTable, column: NumericColumn) -> Vec<f64> {
    per_sheet(table, column, first_difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::align;
    use crate::models::{AlignmentMode, NormalizedRow, NumericEncoding, SheetTable, TimeLabel};

    const NAN: f64 = f64::NAN;

    fn same(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| (x.is_nan() && y.is_nan()) || (x - y).abs() < 1e-12)
    }

    #[test]
    fn partial_windows_at_start() {
        let out = rolling_mean(&[2.0, 4.0, 6.0, 8.0], 3);
        assert!(same(&out, &[2.0, 3.0, 4.0, 6.0]));
    }

    #[test]
    fn window_skips_missing() {
        let out = rolling_mean(&[NAN, 4.0, NAN, 8.0], 2);
        assert!(same(&out, &[NAN, 4.0, 4.0, 8.0]));
    }

    #[test]
    fn zero_width_acts_as_one() {
        let v = [1.0, 5.0, NAN];
        assert!(same(&rolling_mean(&v, 0), &v));
    }

    #[test]
    fn differences() {
        assert!(same(&first_difference(&[1.0, 4.0, 2.0]), &[NAN, 3.0, -2.0]));
        assert!(first_difference(&[]).is_empty());
        assert!(same(&first_difference(&[7.0]), &[NAN]));
    }

    fn sheet(name: &str, labels: &[i64], quantity: &[f64]) -> SheetTable {
        let rows = labels
            .iter()
            .zip(quantity)
            .enumerate()
            .map(|(i, (m, q))| NormalizedRow {
                sheet: name.into(),
                source_row: i,
                label: TimeLabel::from_minutes(*m),
                instant: None,
                quantity: *q,
                metric_a: 0.0,
                metric_b: 0.0,
                date_label: String::new(),
                sensor_type: String::new(),
                time_key: String::new(),
                elapsed_minutes: None,
            })
            .collect();
        SheetTable {
            sheet: name.into(),
            rows,
            dropped_rows: 0,
            encoding: NumericEncoding::DayFraction,
        }
    }

    #[test]
    fn transforms_restart_per_sheet_in_interleaved_table() {
        let a = sheet("A", &[540, 545], &[1.0, 3.0]);
        let b = sheet("B", &[540, 545], &[10.0, 30.0]);
        let combined = align(&[a, b], AlignmentMode::RawAppend);
        let table = DerivedTable::from_combined(&combined);

        // Row order: A 09:00, B 09:00, A 09:05, B 09:05
        let rolled = rolling_by_sheet(&table, NumericColumn::Quantity, 2);
        assert!(same(&rolled, &[1.0, 10.0, 2.0, 20.0]));

        let diff = difference_by_sheet(&table, NumericColumn::Quantity);
        assert!(same(&diff, &[NAN, NAN, 2.0, 20.0]));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn series() -> impl Strategy<Value = Vec<f64>> {
            proptest::collection::vec(prop_oneof![Just(f64::NAN), -1e6_f64..1e6], 0..=60)
        }

        proptest! {
            #[test]
            fn width_one_is_identity(values in series()) {
                prop_assert!(same(&rolling_mean(&values, 1), &values));
            }

            #[test]
            fn rolling_stays_within_range(values in series(), window in 1usize..=20) {
                let lo = values.iter().copied().filter(|v| !v.is_nan()).fold(f64::INFINITY, f64::min);
                let hi = values.iter().copied().filter(|v| !v.is_nan()).fold(f64::NEG_INFINITY, f64::max);
                for v in rolling_mean(&values, window).into_iter().filter(|v| !v.is_nan()) {
                    prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6);
                }
            }
        }
    }
}
