//! Workbook abstraction.
//!
//! The spreadsheet reader is an external collaborator: the pipeline only
//! needs sheet names and a grid of cells per sheet.

use std::collections::BTreeMap;

use super::types::{CellGrid, CellValue, SheetError, SheetResult};

/// Source of sheets for one analysis session.
pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Cells of one sheet, header row first.
    fn read_grid(&self, sheet: &str) -> SheetResult<CellGrid>;
}

/// Workbook held entirely in memory.
///
/// Sheets keep insertion order. A sheet may be stored as a read failure so
/// that readers which load eagerly can still report per-sheet errors.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    order: Vec<String>,
    sheets: BTreeMap<String, Result<CellGrid, String>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sheet.
    pub fn insert_sheet(&mut self, name: impl Into<String>, grid: CellGrid) {
        self.insert(name.into(), Ok(grid));
    }

    /// Add a sheet (builder pattern).
    pub fn with_sheet(mut self, name: impl Into<String>, grid: CellGrid) -> Self {
        self.insert_sheet(name, grid);
        self
    }

    /// Record a sheet that exists but could not be read.
    pub fn insert_failed_sheet(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.insert(name.into(), Err(message.into()));
    }

    fn insert(&mut self, name: String, grid: Result<CellGrid, String>) {
        if !self.sheets.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.sheets.insert(name, grid);
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_grid(&self, sheet: &str) -> SheetResult<CellGrid> {
        match self.sheets.get(sheet) {
            Some(Ok(grid)) => Ok(grid.clone()),
            Some(Err(message)) => Err(SheetError::read(sheet, message.clone())),
            None => Err(SheetError::not_found(sheet)),
        }
    }
}

/// Build a four-column grid from plain rows; handy for tests and demos.
pub fn grid_from_rows<T, Q, A, B>(
    headers: [&str; 4],
    rows: impl IntoIterator<Item = (T, Q, A, B)>,
) -> CellGrid
where
    T: Into<CellValue>,
    Q: Into<CellValue>,
    A: Into<CellValue>,
    B: Into<CellValue>,
{
    let mut grid = vec![headers.iter().map(|h| CellValue::from(*h)).collect()];
    grid.extend(
        rows.into_iter()
            .map(|(t, q, a, b)| vec![t.into(), q.into(), a.into(), b.into()]),
    );
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let wb = MemoryWorkbook::new()
            .with_sheet("0528_B", Vec::new())
            .with_sheet("0526_A", Vec::new());
        assert_eq!(wb.sheet_names(), vec!["0528_B", "0526_A"]);
    }

    #[test]
    fn replacing_a_sheet_keeps_position() {
        let mut wb = MemoryWorkbook::new()
            .with_sheet("a", Vec::new())
            .with_sheet("b", Vec::new());
        wb.insert_sheet("a", vec![vec![CellValue::from("x")]]);
        assert_eq!(wb.sheet_names(), vec!["a", "b"]);
        assert_eq!(wb.read_grid("a").unwrap().len(), 1);
    }

    #[test]
    fn missing_and_failed_sheets() {
        let mut wb = MemoryWorkbook::new();
        wb.insert_failed_sheet("broken", "corrupt xml");
        assert!(matches!(wb.read_grid("nope"), Err(SheetError::NotFound { .. })));
        let err = wb.read_grid("broken").unwrap_err();
        assert_eq!(err.sheet(), "broken");
        assert!(err.to_string().contains("corrupt xml"));
    }

    #[test]
    fn grid_from_rows_builds_header_and_rows() {
        let grid = grid_from_rows(
            ["Time", "Qty", "RH-1", "RH-2"],
            [("09:00", 1.0, 2.0, 3.0), ("09:05", 4.0, 5.0, 6.0)],
        );
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][2], CellValue::from("RH-1"));
        assert_eq!(grid[2][1], CellValue::Number(4.0));
    }
}
