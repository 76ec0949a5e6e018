//! Raw cell and sheet types produced by the workbook readers.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single spreadsheet cell as delivered by the reader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Date and time of day.
    DateTime(NaiveDateTime),
    /// Time of day without a date.
    Time(NaiveTime),
    /// Spreadsheet error literal such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// Whether the cell carries no usable value.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty | CellValue::Error(_) => true,
            CellValue::Number(v) => !v.is_finite(),
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Literal text form, used when a value cannot be interpreted.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(v) => format_number(*v),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.to_string(),
            CellValue::Time(t) => t.to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::Time(t)
    }
}

/// Format a number without a trailing `.0` for integral values.
pub(crate) fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Rows of cells, header row first.
pub type CellGrid = Vec<Vec<CellValue>>;

/// One data row after positional column mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheetRow {
    pub timestamp: CellValue,
    pub quantity: f64,
    pub metric_a: f64,
    pub metric_b: f64,
}

/// A sheet reduced to the four expected columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    /// Original header names of the first four columns.
    pub headers: [String; 4],
    pub rows: Vec<RawSheetRow>,
}

/// Failure scoped to a single sheet.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SheetError {
    /// The requested sheet does not exist.
    #[error("Sheet '{sheet}' not found in workbook")]
    NotFound { sheet: String },

    /// The sheet is narrower than the four expected columns.
    #[error(
        "Sheet '{sheet}' has {found} column(s), expected at least 4 (timestamp, quantity, metric A, metric B)"
    )]
    TooFewColumns { sheet: String, found: usize },

    /// A numeric column holds a value that is not a number.
    #[error("Sheet '{sheet}' row {row}, column '{column}': cannot convert '{value}' to a number")]
    UnconvertibleCell {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    /// The reader failed on this sheet.
    #[error("Failed to read sheet '{sheet}': {message}")]
    Read { sheet: String, message: String },
}

impl SheetError {
    pub fn not_found(sheet: impl Into<String>) -> Self {
        Self::NotFound {
            sheet: sheet.into(),
        }
    }

    pub fn read(sheet: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            sheet: sheet.into(),
            message: message.into(),
        }
    }

    /// Name of the sheet this error belongs to.
    pub fn sheet(&self) -> &str {
        match self {
            Self::NotFound { sheet }
            | Self::TooFewColumns { sheet, .. }
            | Self::UnconvertibleCell { sheet, .. }
            | Self::Read { sheet, .. } => sheet,
        }
    }
}

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Failure to open a workbook as a whole.
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook '{path}': {message}")]
    Open { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for workbook operations.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells() {
        assert!(CellValue::Empty.is_missing());
        assert!(CellValue::Error("#N/A".into()).is_missing());
        assert!(CellValue::Text("   ".into()).is_missing());
        assert!(CellValue::Number(f64::NAN).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
        assert!(!CellValue::Text("09:00".into()).is_missing());
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(905.0).display_text(), "905");
        assert_eq!(CellValue::Number(2.5).display_text(), "2.5");
    }

    #[test]
    fn sheet_error_reports_sheet_name() {
        let err = SheetError::TooFewColumns {
            sheet: "0526_RH".into(),
            found: 3,
        };
        assert_eq!(err.sheet(), "0526_RH");
        assert!(err.to_string().contains("0526_RH"));
        assert!(err.to_string().contains("3 column"));
    }
}
