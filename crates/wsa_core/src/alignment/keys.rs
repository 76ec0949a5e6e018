//! Grouping keys derived per row.

use crate::models::{NormalizedRow, TimeLabel};

/// Compound `"{sheet}_{label}"` key.
///
/// Used as the x-axis key when sheets are laid out one after another, so
/// that line charts never join the last point of one sheet to the first
/// point of the next.
pub fn composite_key(sheet: &str, label: &TimeLabel) -> String {
    format!("{}_{}", sheet, label)
}

/// Minutes since the first reading of one sheet, per row.
///
/// When every row carries an absolute instant the offsets are exact and may
/// span several days. Otherwise offsets come from the `HH:MM` labels and
/// rows with a literal (unparsed) label get `None`.
pub fn elapsed_minutes(rows: &[NormalizedRow]) -> Vec<Option<f64>> {
    let instants: Option<Vec<_>> = rows.iter().map(|r| r.instant).collect();
    if let Some(instants) = instants {
        let Some(start) = instants.iter().min().copied() else {
            return Vec::new();
        };
        return instants
            .iter()
            .map(|t| Some((*t - start).num_seconds() as f64 / 60.0))
            .collect();
    }

    let minutes: Vec<Option<u32>> = rows.iter().map(|r| r.label.minutes_of_day()).collect();
    let start = minutes.iter().flatten().min().copied();
    minutes
        .iter()
        .map(|m| match (m, start) {
            (Some(m), Some(s)) => Some(f64::from(*m) - f64::from(s)),
            _ => None,
        })
        .collect()
}
