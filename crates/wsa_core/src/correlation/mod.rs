//! Correlation analysis.
//!
//! - Pearson matrices over the numeric columns, globally and per sheet,
//!   with pairwise-complete observations.
//! - Lagged cross-correlation between two columns.
//!
//! All functions are pure - no I/O, no side effects.

mod lag;
mod pearson;
mod types;

pub use lag::lag_correlation;
pub use pearson::{pearson, per_sheet_matrices, CorrelationMatrix, SheetCorrelation};
pub use types::{
    CorrelationError, CorrelationResult, LagCorrelationSeries, LagPoint, MAX_LAG_LIMIT,
};
