//! Error types for analysis requests.
//!
//! Request errors are raised before any sheet is read. Failures of single
//! sheets are not errors at this level; they are collected in the report.

use thiserror::Error;

use crate::config::MAX_ROLLING_WINDOW;
use crate::correlation::{CorrelationError, MAX_LAG_LIMIT};
use crate::models::NumericColumn;

/// Invalid analysis request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("Max lag must be between 1 and {limit}, got {max_lag}")]
    InvalidMaxLag { max_lag: usize, limit: usize },

    #[error("Rolling window must be between 1 and {limit}, got {window}")]
    InvalidRollingWindow { window: usize, limit: usize },

    #[error("Reference and comparison columns must differ, both are '{column}'")]
    SameColumns { column: NumericColumn },
}

impl RequestError {
    pub fn invalid_max_lag(max_lag: usize) -> Self {
        Self::InvalidMaxLag {
            max_lag,
            limit: MAX_LAG_LIMIT,
        }
    }

    pub fn invalid_rolling_window(window: usize) -> Self {
        Self::InvalidRollingWindow {
            window,
            limit: MAX_ROLLING_WINDOW,
        }
    }
}

impl From<CorrelationError> for RequestError {
    fn from(err: CorrelationError) -> Self {
        match err {
            CorrelationError::InvalidMaxLag { max_lag, limit } => {
                Self::InvalidMaxLag { max_lag, limit }
            }
        }
    }
}

/// Result type for request handling.
pub type RequestResult<T> = Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_values() {
        assert_eq!(
            RequestError::invalid_rolling_window(0).to_string(),
            "Rolling window must be between 1 and 20, got 0"
        );
        let err = RequestError::SameColumns {
            column: NumericColumn::MetricA,
        };
        assert!(err.to_string().contains("MetricA"));
    }

    #[test]
    fn correlation_error_converts() {
        let err: RequestError = CorrelationError::invalid_max_lag(500).into();
        assert_eq!(err, RequestError::invalid_max_lag(500));
    }
}
