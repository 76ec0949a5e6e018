//! Analysis request parameters.

use serde::{Deserialize, Serialize};

use crate::config::{AnalysisSettings, DisplaySettings, Settings, MAX_ROLLING_WINDOW};
use crate::correlation::MAX_LAG_LIMIT;
use crate::models::{AlignmentMode, GroupStat, MissingPolicy, NumericColumn, NumericEncoding};

use super::errors::{RequestError, RequestResult};

/// Everything one analysis run needs besides the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Selected sheets, in selection order. Empty means idle.
    pub sheets: Vec<String>,
    pub alignment: AlignmentMode,
    /// First series of the lag correlation.
    pub reference_column: NumericColumn,
    /// Second series of the lag correlation, shifted by the lag.
    pub comparison_column: NumericColumn,
    pub max_lag: usize,
    pub rolling_window: usize,
    pub group_stat: GroupStat,
    pub missing_policy: MissingPolicy,
    pub timestamp_encoding: NumericEncoding,
    /// Passed through to the report untouched.
    pub display: DisplaySettings,
}

impl AnalysisRequest {
    /// Request with default parameters.
    pub fn new<S: Into<String>>(sheets: impl IntoIterator<Item = S>) -> Self {
        Self::from_analysis_settings(&AnalysisSettings::default(), sheets)
    }

    /// Request using the configured defaults.
    pub fn from_settings<S: Into<String>>(settings: &Settings, sheets: impl IntoIterator<Item = S>) -> Self {
        Self {
            display: settings.display.clone(),
            ..Self::from_analysis_settings(&settings.analysis, sheets)
        }
    }

    fn from_analysis_settings<S: Into<String>>(
        analysis: &AnalysisSettings,
        sheets: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            sheets: sheets.into_iter().map(Into::into).collect(),
            alignment: analysis.alignment,
            reference_column: analysis.reference_column,
            comparison_column: analysis.comparison_column,
            max_lag: analysis.max_lag,
            rolling_window: analysis.rolling_window,
            group_stat: analysis.group_stat,
            missing_policy: analysis.missing_policy,
            timestamp_encoding: analysis.timestamp_encoding,
            display: DisplaySettings::default(),
        }
    }

    pub fn with_alignment(mut self, alignment: AlignmentMode) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_columns(mut self, reference: NumericColumn, comparison: NumericColumn) -> Self {
        self.reference_column = reference;
        self.comparison_column = comparison;
        self
    }

    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = max_lag;
        self
    }

    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    pub fn with_group_stat(mut self, stat: GroupStat) -> Self {
        self.group_stat = stat;
        self
    }

    pub fn with_missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.missing_policy = policy;
        self
    }

    pub fn with_timestamp_encoding(mut self, encoding: NumericEncoding) -> Self {
        self.timestamp_encoding = encoding;
        self
    }

    /// Check parameter ranges before any work starts.
    pub fn validate(&self) -> RequestResult<()> {
        if !(1..=MAX_LAG_LIMIT).contains(&self.max_lag) {
            return Err(RequestError::invalid_max_lag(self.max_lag));
        }
        if !(1..=MAX_ROLLING_WINDOW).contains(&self.rolling_window) {
            return Err(RequestError::invalid_rolling_window(self.rolling_window));
        }
        if self.reference_column == self.comparison_column {
            return Err(RequestError::SameColumns {
                column: self.reference_column,
            });
        }
        Ok(())
    }
}
