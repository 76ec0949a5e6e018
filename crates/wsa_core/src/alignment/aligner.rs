//! Merging per-sheet tables into one combined table.

use std::cmp::Ordering;

use crate::models::{AlignmentMode, CombinedTable, NormalizedRow, SheetTable};

/// Merge normalized sheets under the given alignment mode.
///
/// Pure function: folds the sheets (in selection order) into one table.
///
/// - `RawAppend` sorts the whole table chronologically afterwards, so rows
///   of different sheets interleave.
/// - `UnifiedAxis` and `SheetKeyed` keep one block per sheet, each block
///   ordered by time label. Positional matching across sheets is left to
///   [`UnifiedAxis`](super::UnifiedAxis).
///
/// All sorts are stable: ties keep selection order and then source order.
pub fn align(sheets: &[SheetTable], mode: AlignmentMode) -> CombinedTable {
    let mut table = sheets
        .iter()
        .fold(CombinedTable::empty(mode), |mut acc, sheet| {
            acc.sheets.push(sheet.sheet.clone());
            let start = acc.rows.len();
            acc.rows.extend(sheet.rows.iter().cloned());
            if mode != AlignmentMode::RawAppend {
                acc.rows[start..].sort_by(|a, b| a.label.cmp(&b.label));
            }
            acc
        });

    if mode == AlignmentMode::RawAppend {
        table.rows.sort_by(chronological);
    }

    tracing::debug!(
        "Aligned {} sheet(s) into {} rows ({})",
        table.sheets.len(),
        table.rows.len(),
        mode
    );
    table
}

/// Dated rows first in time order, then undated rows by label.
fn chronological(a: &NormalizedRow, b: &NormalizedRow) -> Ordering {
    match (a.instant, b.instant) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label.cmp(&b.label),
    }
}
