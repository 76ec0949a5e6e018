//! Correlation result and error types.

use serde::{Deserialize, Serialize};

/// Largest lag the lag correlation accepts.
pub const MAX_LAG_LIMIT: usize = 100;

/// Correlation at one lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagPoint {
    /// Positive lag shifts the second series forward.
    pub lag: i64,
    /// Pearson correlation at this lag, NaN when undefined.
    pub correlation: f64,
}

/// Correlation for every lag in `[-max_lag, max_lag]`, in increasing lag order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagCorrelationSeries {
    pub max_lag: usize,
    pub points: Vec<LagPoint>,
}

impl LagCorrelationSeries {
    /// Number of lags, `2 * max_lag + 1` for a valid request.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Correlation at a given lag.
    pub fn at(&self, lag: i64) -> Option<f64> {
        self.points.iter().find(|p| p.lag == lag).map(|p| p.correlation)
    }

    /// Lag with the strongest correlation (largest |r|).
    ///
    /// Ties go to the smallest |lag|, then to the negative side. NaN entries
    /// are ignored; `None` when every entry is NaN.
    pub fn peak(&self) -> Option<LagPoint> {
        self.points
            .iter()
            .filter(|p| !p.correlation.is_nan())
            .min_by(|a, b| {
                b.correlation
                    .abs()
                    .total_cmp(&a.correlation.abs())
                    .then(a.lag.abs().cmp(&b.lag.abs()))
                    .then(a.lag.cmp(&b.lag))
            })
            .copied()
    }
}

/// Error types for correlation operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrelationError {
    /// Max lag outside `[1, MAX_LAG_LIMIT]`.
    #[error("Max lag must be between 1 and {limit}, got {max_lag}")]
    InvalidMaxLag { max_lag: usize, limit: usize },
}

impl CorrelationError {
    pub fn invalid_max_lag(max_lag: usize) -> Self {
        Self::InvalidMaxLag {
            max_lag,
            limit: MAX_LAG_LIMIT,
        }
    }
}

/// Type alias for correlation results.
pub type CorrelationResult<T> = Result<T, CorrelationError>;
