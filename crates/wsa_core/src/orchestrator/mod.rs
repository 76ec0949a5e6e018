//! Request orchestration.
//!
//! One request runs the whole pipeline from scratch:
//!
//! ```text
//! analyze
//!     ├── validate request
//!     ├── per sheet: load → normalize   (failures collected, not fatal)
//!     ├── align
//!     ├── derived columns
//!     ├── metrics / diagnostics / tiers
//!     └── correlation matrices / lag correlation
//! ```
//!
//! # Example
//!
//! ```
//! use wsa_core::ingest::{grid_from_rows, MemoryWorkbook};
//! use wsa_core::orchestrator::{analyze, AnalysisRequest};
//!
//! let workbook = MemoryWorkbook::new().with_sheet(
//!     "0526_RH",
//!     grid_from_rows(
//!         ["Time", "Qty", "RH-1", "RH-2"],
//!         [("09:00", 5.0, 10.0, 8.0), ("09:05", 10.0, 20.0, 18.0)],
//!     ),
//! );
//!
//! let report = analyze(&workbook, &AnalysisRequest::new(["0526_RH"])).unwrap();
//! assert_eq!(report.table.len(), 2);
//! let json = report.to_json().unwrap();
//! assert!(json.contains("\"0526_RH\""));
//! ```

mod errors;
mod report;
mod request;
mod runner;

pub use errors::{RequestError, RequestResult};
pub use report::{AnalysisReport, SeriesTransform, SheetFailure};
pub use request::AnalysisRequest;
pub use runner::analyze;
