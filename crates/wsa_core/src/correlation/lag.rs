//! Time-lag cross-correlation.

use super::pearson::pearson;
use super::types::{CorrelationError, CorrelationResult, LagCorrelationSeries, LagPoint, MAX_LAG_LIMIT};

/// Correlate two series over every lag in `[-max_lag, max_lag]`.
///
/// Missing values are dropped from each series independently, then both are
/// truncated to the shorter length. At lag `k`, `series1[i]` is paired with
/// `series2[i - k]`; positions that fall outside either series are left out.
/// Lags with fewer than two pairs give NaN.
pub fn lag_correlation(
    series1: &[f64],
    series2: &[f64],
    max_lag: usize,
) -> CorrelationResult<LagCorrelationSeries> {
    if !(1..=MAX_LAG_LIMIT).contains(&max_lag) {
        return Err(CorrelationError::invalid_max_lag(max_lag));
    }

    let a: Vec<f64> = series1.iter().copied().filter(|v| !v.is_nan()).collect();
    let b: Vec<f64> = series2.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let max = max_lag as i64;
    let points = (-max..=max)
        .map(|lag| LagPoint {
            lag,
            correlation: correlate_at(a, b, lag),
        })
        .collect();

    Ok(LagCorrelationSeries { max_lag, points })
}

fn correlate_at(a: &[f64], b: &[f64], lag: i64) -> f64 {
    let shift = lag.unsigned_abs() as usize;
    if shift >= a.len() {
        return f64::NAN;
    }
    if lag >= 0 {
        pearson(&a[shift..], &b[..b.len() - shift])
    } else {
        pearson(&a[..a.len() - shift], &b[shift..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn output_covers_symmetric_lag_range() {
        let s = lag_correlation(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 4.0], 3).unwrap();
        assert_eq!(s.len(), 7);
        let lags: Vec<i64> = s.points.iter().map(|p| p.lag).collect();
        assert_eq!(lags, [-3, -2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn lag_zero_is_plain_pearson() {
        let x = [1.0, 4.0, 2.0, 8.0, 5.0];
        let y = [2.0, 3.0, 3.0, 9.0, 4.0];
        let s = lag_correlation(&x, &y, 2).unwrap();
        assert_eq!(s.at(0), Some(pearson(&x, &y)));
    }

    #[test]
    fn detects_delayed_copy() {
        // y is x delayed by two steps
        let x = [0.0, 1.0, 5.0, 2.0, 8.0, 3.0, 9.0, 4.0, 7.0, 1.0];
        let y = [6.0, 6.0, 0.0, 1.0, 5.0, 2.0, 8.0, 3.0, 9.0, 4.0];
        let s = lag_correlation(&y, &x, 3).unwrap();
        let peak = s.peak().unwrap();
        assert_eq!(peak.lag, 2);
        assert!((peak.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_values_dropped_then_truncated() {
        let x = [1.0, NAN, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0];
        let s = lag_correlation(&x, &y, 1).unwrap();
        assert!((s.at(0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lags_beyond_length_are_nan() {
        let s = lag_correlation(&[1.0, 2.0, 3.0], &[3.0, 1.0, 2.0], 5).unwrap();
        assert!(s.at(5).unwrap().is_nan());
        assert!(s.at(-3).unwrap().is_nan());
        // two pairs remain at lag 1
        assert!(!s.at(1).unwrap().is_nan());
    }

    #[test]
    fn max_lag_is_bounded() {
        assert_eq!(
            lag_correlation(&[1.0], &[1.0], 0).unwrap_err(),
            CorrelationError::invalid_max_lag(0)
        );
        assert!(lag_correlation(&[1.0], &[1.0], 101).is_err());
        assert!(lag_correlation(&[1.0], &[1.0], 100).is_ok());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn series() -> impl Strategy<Value = Vec<f64>> {
            proptest::collection::vec(prop_oneof![1 => Just(f64::NAN), 9 => -1e3_f64..1e3], 0..=40)
        }

        proptest! {
            #[test]
            fn length_and_lag_zero(x in series(), y in series(), max_lag in 1usize..=100) {
                let s = lag_correlation(&x, &y, max_lag).unwrap();
                prop_assert_eq!(s.len(), 2 * max_lag + 1);

                let a: Vec<f64> = x.iter().copied().filter(|v| !v.is_nan()).collect();
                let b: Vec<f64> = y.iter().copied().filter(|v| !v.is_nan()).collect();
                let n = a.len().min(b.len());
                let expected = pearson(&a[..n], &b[..n]);
                let got = s.at(0).unwrap();
                prop_assert!((got.is_nan() && expected.is_nan()) || got == expected);
            }

            #[test]
            fn correlations_bounded(x in series(), y in series()) {
                let s = lag_correlation(&x, &y, 10).unwrap();
                for p in &s.points {
                    prop_assert!(p.correlation.is_nan() || (-1.0..=1.0).contains(&p.correlation));
                }
            }
        }
    }
}
