//! Sheet loading and normalization.
//!
//! Two pure steps per sheet:
//!
//! 1. [`load_sheet`] validates the shape and maps the first four columns
//!    positionally to (timestamp, quantity, metric A, metric B).
//! 2. [`normalize_sheet`] resolves the sheet's numeric timestamp encoding,
//!    converts timestamps to labels, drops rows without one, applies the
//!    missing-value policy and tags each row with its grouping keys.

use crate::alignment::{composite_key, elapsed_minutes};
use crate::models::{MissingPolicy, NormalizedRow, NumericEncoding, SheetTable};

use super::sheet_name::SheetMeta;
use super::timestamp::{normalize_cell, resolve_encoding};
use super::types::{CellValue, RawSheet, RawSheetRow, SheetError, SheetResult};
use super::workbook::WorkbookSource;

/// Number of leading columns every sheet must provide.
pub const REQUIRED_COLUMNS: usize = 4;

const COLUMN_NAMES: [&str; REQUIRED_COLUMNS] = ["Timestamp", "Quantity", "MetricA", "MetricB"];

/// Read one sheet and map its columns positionally.
///
/// Header names are ignored apart from being kept for display. Fails for
/// the whole sheet when it is narrower than four columns or when a numeric
/// cell holds text that is not a number.
pub fn load_sheet(source: &dyn WorkbookSource, sheet: &str) -> SheetResult<RawSheet> {
    let grid = source.read_grid(sheet)?;

    let width = grid.iter().map(|row| used_width(row)).max().unwrap_or(0);
    if width < REQUIRED_COLUMNS {
        return Err(SheetError::TooFewColumns {
            sheet: sheet.to_string(),
            found: width,
        });
    }

    let mut iter = grid.into_iter();
    let header = iter.next().unwrap_or_default();
    let headers: [String; REQUIRED_COLUMNS] = std::array::from_fn(|i| {
        header
            .get(i)
            .map(CellValue::display_text)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| COLUMN_NAMES[i].to_string())
    });

    let rows = iter
        .enumerate()
        .map(|(i, row)| -> SheetResult<RawSheetRow> {
            // Spreadsheet row number: header is row 1
            let row_number = i + 2;
            let cell = |col: usize| row.get(col).cloned().unwrap_or_default();
            let number = |col: usize| numeric_cell(sheet, row_number, &headers[col], &cell(col));
            Ok(RawSheetRow {
                timestamp: cell(0),
                quantity: number(1)?,
                metric_a: number(2)?,
                metric_b: number(3)?,
            })
        })
        .collect::<SheetResult<Vec<_>>>()?;

    tracing::debug!("Loaded sheet '{}' with {} data rows", sheet, rows.len());

    Ok(RawSheet {
        name: sheet.to_string(),
        headers,
        rows,
    })
}

/// Normalize a loaded sheet into tagged rows.
pub fn normalize_sheet(
    raw: &RawSheet,
    encoding: NumericEncoding,
    missing: MissingPolicy,
) -> SheetTable {
    let encoding = resolve_encoding(encoding, raw.rows.iter().map(|r| &r.timestamp));
    let meta = SheetMeta::parse(&raw.name);
    let fill = |v: f64| match missing {
        MissingPolicy::FillZero if v.is_nan() => 0.0,
        _ => v,
    };

    let mut rows: Vec<NormalizedRow> = raw
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let ts = normalize_cell(&row.timestamp, encoding)?;
            Some(NormalizedRow {
                sheet: raw.name.clone(),
                source_row: i,
                time_key: composite_key(&raw.name, &ts.label),
                label: ts.label,
                instant: ts.instant,
                quantity: fill(row.quantity),
                metric_a: fill(row.metric_a),
                metric_b: fill(row.metric_b),
                date_label: meta.date_label.clone(),
                sensor_type: meta.sensor_type.clone(),
                elapsed_minutes: None,
            })
        })
        .collect();

    let elapsed = elapsed_minutes(&rows);
    for (row, minutes) in rows.iter_mut().zip(elapsed) {
        row.elapsed_minutes = minutes;
    }

    let dropped_rows = raw.rows.len() - rows.len();
    if dropped_rows > 0 {
        tracing::debug!(
            "Sheet '{}': dropped {} row(s) without a timestamp",
            raw.name,
            dropped_rows
        );
    }

    SheetTable {
        sheet: raw.name.clone(),
        rows,
        dropped_rows,
        encoding,
    }
}

/// Width of a row ignoring trailing empty cells.
fn used_width(row: &[CellValue]) -> usize {
    row.iter()
        .rposition(|c| !matches!(c, CellValue::Empty))
        .map_or(0, |i| i + 1)
}

/// Convert a quantity/metric cell; missing values become NaN.
fn numeric_cell(sheet: &str, row: usize, column: &str, cell: &CellValue) -> SheetResult<f64> {
    let unconvertible = || SheetError::UnconvertibleCell {
        sheet: sheet.to_string(),
        row,
        column: column.to_string(),
        value: cell.display_text(),
    };

    match cell {
        CellValue::Empty | CellValue::Error(_) => Ok(f64::NAN),
        CellValue::Number(v) => Ok(*v),
        CellValue::Text(s) if s.trim().is_empty() => Ok(f64::NAN),
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| unconvertible()),
        CellValue::Bool(_) | CellValue::DateTime(_) | CellValue::Time(_) => Err(unconvertible()),
    }
}
