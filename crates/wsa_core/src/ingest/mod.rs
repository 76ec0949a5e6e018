//! Workbook ingestion.
//!
//! This module turns a workbook into per-sheet normalized tables:
//!
//! 1. **Workbook access** (`workbook`, `xlsx`): the [`WorkbookSource`] trait
//!    with an in-memory implementation and a calamine-backed file reader.
//!
//! 2. **Loading** (`loader`): positional mapping of the first four columns
//!    and shape validation. A malformed sheet fails on its own.
//!
//! 3. **Timestamp normalization** (`timestamp`): one conversion rule per raw
//!    timestamp kind, one numeric encoding per sheet.
//!
//! 4. **Sheet-name labels** (`sheet_name`): date and sensor-type labels.
//!
//! # Usage
//!
//! ```
//! use wsa_core::ingest::{grid_from_rows, load_sheet, normalize_sheet, MemoryWorkbook};
//! use wsa_core::models::{MissingPolicy, NumericEncoding};
//!
//! let workbook = MemoryWorkbook::new().with_sheet(
//!     "0526_RH",
//!     grid_from_rows(
//!         ["Time", "Qty", "RH-1", "RH-2"],
//!         [("09:00", 5.0, 10.0, 8.0), ("09:05", 10.0, 20.0, 18.0)],
//!     ),
//! );
//!
//! let raw = load_sheet(&workbook, "0526_RH").unwrap();
//! let table = normalize_sheet(&raw, NumericEncoding::Auto, MissingPolicy::Keep);
//! assert_eq!(table.rows[1].label.as_str(), "09:05");
//! ```

mod loader;
mod sheet_name;
pub mod timestamp;
mod types;
mod workbook;
#[cfg(feature = "xlsx")]
mod xlsx;

pub use loader::{load_sheet, normalize_sheet, REQUIRED_COLUMNS};
pub use sheet_name::SheetMeta;
pub use timestamp::{detect_encoding, normalize_cell, NormalizedTimestamp, RawTimestamp};
pub use types::{
    CellGrid, CellValue, RawSheet, RawSheetRow, SheetError, SheetResult, WorkbookError,
    WorkbookResult,
};
pub use workbook::{grid_from_rows, MemoryWorkbook, WorkbookSource};
#[cfg(feature = "xlsx")]
pub use xlsx::XlsxWorkbook;
