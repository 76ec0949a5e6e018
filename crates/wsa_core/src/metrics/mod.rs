//! Derived metrics and statistics.
//!
//! Everything here is a pure function of a [`DerivedTable`]:
//!
//! - **Derived columns** (`derived`): per-unit ratios and delta.
//! - **Statistics** (`stats`): NaN-skipping aggregates and `describe`.
//! - **Series transforms** (`rolling`): rolling mean and first difference,
//!   restarted at every sheet.
//! - **Summaries** (`summary`): per-sheet summary, sheet comparison, SRI.
//! - **Diagnostics** (`diagnostics`): energy per unit, transition rate,
//!   dispersion and the relative-to-mean view.
//! - **Tiers** (`tiers`): tertile buckets of production quantity.
//! - **Grouping** (`grouping`): per-unit signal by time of day and sensor
//!   type, across dates.

mod derived;
mod diagnostics;
mod grouping;
mod rolling;
pub mod stats;
mod summary;
mod tiers;

pub use derived::{column_values, delta, per_unit, DerivedMetricRow, DerivedTable};
pub use diagnostics::{
    relative_to_mean, transition_rate, DiagnosticMetrics, DiagnosticsReport, SheetDiagnostics,
};
pub use grouping::{group_by_time_of_day, TimeOfDayGroup};
pub use rolling::{difference_by_sheet, first_difference, rolling_by_sheet, rolling_mean};
pub use stats::ColumnStats;
pub use summary::{
    describe_rows, sri, sri_of, summarize_sheets, MissingCounts, SheetComparison, SheetStatRow,
    SheetSummary,
};
pub use tiers::{assign_tier, tertile_edges, QuantityTier, TierBreakdown, TierStats};
