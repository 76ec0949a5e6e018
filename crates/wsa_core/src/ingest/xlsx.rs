//! Spreadsheet files (`.xlsx`, `.xlsm`, `.xls`, `.ods`) via calamine.
//!
//! Every sheet is read eagerly when the workbook is opened. A sheet that
//! fails to read is kept as a per-sheet failure so the other sheets stay
//! usable.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use super::timestamp::{serial_to_datetime, serial_to_time};
use super::types::{CellGrid, CellValue, SheetResult, WorkbookError, WorkbookResult};
use super::workbook::{MemoryWorkbook, WorkbookSource};

/// A spreadsheet file loaded into memory.
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    inner: MemoryWorkbook,
}

impl XlsxWorkbook {
    /// Open a spreadsheet file from disk.
    pub fn open(path: impl AsRef<Path>) -> WorkbookResult<Self> {
        let path = path.as_ref();
        let sheets = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!("Opened workbook {}", path.display());
        Ok(Self::read_all(sheets))
    }

    /// Open an uploaded spreadsheet held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> WorkbookResult<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
            WorkbookError::Open {
                path: "<upload>".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::read_all(sheets))
    }

    fn read_all<RS: Read + Seek>(mut sheets: Sheets<RS>) -> Self {
        let mut inner = MemoryWorkbook::new();
        for name in sheets.sheet_names() {
            match sheets.worksheet_range(&name) {
                Ok(range) => {
                    let grid = grid_from_range(&range);
                    inner.insert_sheet(name, grid);
                }
                Err(e) => {
                    tracing::warn!("Failed to read sheet '{}': {}", name, e);
                    inner.insert_failed_sheet(name, e.to_string());
                }
            }
        }
        Self { inner }
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_grid(&self, sheet: &str) -> SheetResult<CellGrid> {
        self.inner.read_grid(sheet)
    }
}

/// Cells of a used range, positioned from A1.
///
/// calamine trims leading blank rows and columns from the range; they are
/// put back as empty cells so the positional column mapping still starts
/// at column A and the header stays on row 1.
fn grid_from_range(range: &Range<Data>) -> CellGrid {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let mut grid: CellGrid = (0..first_row).map(|_| Vec::new()).collect();
    grid.extend(range.rows().map(|row| {
        std::iter::repeat(CellValue::Empty)
            .take(first_col as usize)
            .chain(row.iter().map(convert_cell))
            .collect::<Vec<_>>()
    }));
    grid
}

/// Map a calamine cell onto the reader-neutral cell type.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => serial_cell(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        #[allow(unreachable_patterns)]
        _ => CellValue::Empty,
    }
}

/// Date-formatted serial numbers: pure times stay dateless.
fn serial_cell(serial: f64) -> CellValue {
    if serial >= 1.0 {
        serial_to_datetime(serial).map_or(CellValue::Number(serial), CellValue::DateTime)
    } else {
        serial_to_time(serial).map_or(CellValue::Number(serial), CellValue::Time)
    }
}
