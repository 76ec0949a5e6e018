//! Request runner: load, normalize, then assemble the report.

use std::collections::HashSet;

use crate::ingest::{load_sheet, normalize_sheet, WorkbookSource};
use crate::models::SheetTable;

use super::errors::RequestResult;
use super::report::{AnalysisReport, SheetFailure};
use super::request::AnalysisRequest;

/// Run one analysis request against a workbook.
///
/// The request is validated first. Each selected sheet is then loaded and
/// normalized on its own; a sheet that fails is recorded in the report and
/// the remaining sheets are analyzed as usual. Nothing selected gives an
/// idle report.
pub fn analyze(source: &dyn WorkbookSource, request: &AnalysisRequest) -> RequestResult<AnalysisReport> {
    request.validate()?;

    if request.sheets.is_empty() {
        tracing::debug!("No sheets selected, returning idle report");
        return AnalysisReport::idle(request);
    }

    tracing::info!(
        "Analyzing {} sheet(s), alignment: {}",
        request.sheets.len(),
        request.alignment
    );

    let mut seen = HashSet::new();
    let mut tables: Vec<SheetTable> = Vec::new();
    let mut failures: Vec<SheetFailure> = Vec::new();

    for sheet in &request.sheets {
        if !seen.insert(sheet.as_str()) {
            tracing::warn!("Sheet '{}' selected twice, ignoring repeat", sheet);
            continue;
        }

        match load_sheet(source, sheet) {
            Ok(raw) => {
                let table = normalize_sheet(&raw, request.timestamp_encoding, request.missing_policy);
                tracing::debug!(
                    "Sheet '{}': {} row(s), {} dropped, {:?} timestamps",
                    sheet,
                    table.len(),
                    table.dropped_rows,
                    table.encoding
                );
                tables.push(table);
            }
            Err(e) => {
                tracing::warn!("Skipping sheet: {}", e);
                failures.push(SheetFailure::from(e));
            }
        }
    }

    let report = AnalysisReport::assemble(request, &tables, failures)?;

    tracing::info!(
        "Analysis complete: {} row(s) from {} sheet(s), {} failed",
        report.table.len(),
        tables.len(),
        report.failures.len()
    );
    Ok(report)
}
