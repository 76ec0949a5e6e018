//! Core enums used throughout the analysis pipeline.

use serde::{Deserialize, Serialize};

/// How per-sheet tables are merged into one combined table.
///
/// Sheets recorded on different calendar days have no single correct
/// alignment, so the caller always picks one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Concatenate and sort by each row's absolute timestamp. Rows of
    /// different sheets interleave.
    RawAppend,
    /// One block per sheet in label order; the union of labels is an
    /// ordered categorical axis shared by all sheets.
    #[default]
    UnifiedAxis,
    /// One block per sheet in label order, keyed by `"{sheet}_{label}"`.
    SheetKeyed,
}

impl AlignmentMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RawAppend => "Raw Append (chronological)",
            Self::UnifiedAxis => "Unified Time Axis",
            Self::SheetKeyed => "Sheet + Time Key",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [AlignmentMode] {
        &[Self::RawAppend, Self::UnifiedAxis, Self::SheetKeyed]
    }
}

impl std::fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Statistic used when comparing sheets side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStat {
    #[default]
    Mean,
    Std,
    Min,
    Max,
}

impl std::fmt::Display for GroupStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupStat::Mean => write!(f, "mean"),
            GroupStat::Std => write!(f, "std"),
            GroupStat::Min => write!(f, "min"),
            GroupStat::Max => write!(f, "max"),
        }
    }
}

/// What to do with missing numeric cells before derived columns are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Keep missing values as NaN.
    #[default]
    Keep,
    /// Replace missing quantity/metric values with zero.
    FillZero,
}

/// Interpretation of purely numeric timestamp cells within one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericEncoding {
    /// Decide per sheet from the values themselves.
    #[default]
    Auto,
    /// Spreadsheet serial time (fraction of a day, optionally with a date part).
    DayFraction,
    /// Wall-clock number written as `HHMM`, e.g. `905` for 09:05.
    ClockNumber,
}

/// Numeric columns available for statistics and correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Quantity,
    MetricA,
    MetricB,
    Delta,
    MetricAPerUnit,
    MetricBPerUnit,
}

impl NumericColumn {
    /// The full column set, in display order.
    pub fn all() -> &'static [NumericColumn] {
        &[
            Self::Quantity,
            Self::MetricA,
            Self::MetricB,
            Self::Delta,
            Self::MetricAPerUnit,
            Self::MetricBPerUnit,
        ]
    }

    /// Sensor readings and their per-unit forms: the series that get a
    /// rolling mean and first difference in the report.
    pub fn signals() -> &'static [NumericColumn] {
        &[
            Self::MetricA,
            Self::MetricB,
            Self::MetricAPerUnit,
            Self::MetricBPerUnit,
        ]
    }

    /// Column label used in tables and the report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quantity => "Quantity",
            Self::MetricA => "MetricA",
            Self::MetricB => "MetricB",
            Self::Delta => "Delta",
            Self::MetricAPerUnit => "MetricA_per_unit",
            Self::MetricBPerUnit => "MetricB_per_unit",
        }
    }
}

impl std::fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
