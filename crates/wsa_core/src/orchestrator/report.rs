//! The analysis report handed to the presentation layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alignment::{align, UnifiedAxis};
use crate::correlation::{
    lag_correlation, per_sheet_matrices, CorrelationMatrix, LagCorrelationSeries, LagPoint,
    SheetCorrelation,
};
use crate::ingest::SheetError;
use crate::metrics::{
    describe_rows, difference_by_sheet, group_by_time_of_day, rolling_by_sheet, sri_of,
    summarize_sheets, ColumnStats, DerivedTable, DiagnosticsReport, SheetComparison,
    SheetSummary, TierBreakdown, TimeOfDayGroup,
};
use crate::models::{NumericColumn, SheetTable};

use super::errors::RequestResult;
use super::request::AnalysisRequest;

/// A selected sheet that could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFailure {
    pub sheet: String,
    pub message: String,
    pub error: SheetError,
}

impl From<SheetError> for SheetFailure {
    fn from(error: SheetError) -> Self {
        Self {
            sheet: error.sheet().to_string(),
            message: error.to_string(),
            error,
        }
    }
}

/// Rolling mean and first difference of one column, indexed like the table rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTransform {
    pub column: NumericColumn,
    pub window: usize,
    pub rolling_mean: Vec<f64>,
    pub first_difference: Vec<f64>,
}

impl SeriesTransform {
    fn build(table: &DerivedTable, column: NumericColumn, window: usize) -> Self {
        Self {
            column,
            window,
            rolling_mean: rolling_by_sheet(table, column, window),
            first_difference: difference_by_sheet(table, column),
        }
    }
}

/// Everything computed for one request.
///
/// Missing values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    /// Combined rows with derived columns, in alignment order.
    pub table: DerivedTable,
    pub axis: UnifiedAxis,
    /// Sheets that loaded and contributed rows.
    pub sheet_count: usize,
    /// Quantity summed over every row; zero when idle.
    pub total_quantity: f64,
    /// One entry per signal column (sensor readings and per-unit values).
    pub transforms: Vec<SeriesTransform>,
    pub global_stats: BTreeMap<NumericColumn, ColumnStats>,
    pub global_sri: f64,
    pub sheets: Vec<SheetSummary>,
    pub comparison: SheetComparison,
    pub diagnostics: DiagnosticsReport,
    /// `None` when quantities cannot be split into three tiers.
    pub tiers: Option<TierBreakdown>,
    /// Per-unit statistics by (time label, sensor type).
    pub time_of_day: Vec<TimeOfDayGroup>,
    pub correlation: CorrelationMatrix,
    pub sheet_correlations: Vec<SheetCorrelation>,
    /// Reference against comparison column; `None` when there are no rows.
    pub lag: Option<LagCorrelationSeries>,
    pub peak_lag: Option<LagPoint>,
    pub failures: Vec<SheetFailure>,
}

impl AnalysisReport {
    /// Build the report from loaded sheets. Pure: no I/O.
    pub fn assemble(
        request: &AnalysisRequest,
        sheets: &[SheetTable],
        failures: Vec<SheetFailure>,
    ) -> RequestResult<Self> {
        let combined = align(sheets, request.alignment);
        let axis = UnifiedAxis::build(&combined);
        let table = DerivedTable::from_combined(&combined);
        let rows = table.all_rows();

        let dropped: BTreeMap<String, usize> = sheets
            .iter()
            .map(|s| (s.sheet.clone(), s.dropped_rows))
            .collect();

        let lag = if table.is_empty() {
            None
        } else {
            Some(lag_correlation(
                &table.column(request.reference_column),
                &table.column(request.comparison_column),
                request.max_lag,
            )?)
        };

        Ok(Self {
            sheet_count: combined.sheets.len(),
            total_quantity: combined.total_quantity(),
            transforms: NumericColumn::signals()
                .iter()
                .map(|&c| SeriesTransform::build(&table, c, request.rolling_window))
                .collect(),
            global_stats: if rows.is_empty() {
                BTreeMap::new()
            } else {
                describe_rows(&rows)
            },
            global_sri: sri_of(&rows),
            sheets: summarize_sheets(&table, &dropped),
            comparison: SheetComparison::build(&table, request.group_stat),
            diagnostics: DiagnosticsReport::build(&table),
            tiers: TierBreakdown::build(&rows),
            time_of_day: group_by_time_of_day(&rows),
            correlation: CorrelationMatrix::compute(&rows, NumericColumn::all()),
            sheet_correlations: per_sheet_matrices(&table, NumericColumn::all()),
            peak_lag: lag.as_ref().and_then(LagCorrelationSeries::peak),
            lag,
            failures,
            axis,
            request: request.clone(),
            table,
        })
    }

    /// Report for a request with nothing selected.
    pub fn idle(request: &AnalysisRequest) -> RequestResult<Self> {
        Self::assemble(request, &[], Vec::new())
    }

    /// No rows were analyzed.
    pub fn is_idle(&self) -> bool {
        self.table.is_empty()
    }

    /// Rolling mean and first difference of one signal column.
    pub fn transform(&self, column: NumericColumn) -> Option<&SeriesTransform> {
        self.transforms.iter().find(|t| t.column == column)
    }

    /// Summary of one sheet.
    pub fn sheet(&self, sheet: &str) -> Option<&SheetSummary> {
        self.sheets.iter().find(|s| s.sheet == sheet)
    }

    /// Serialize for the presentation layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
