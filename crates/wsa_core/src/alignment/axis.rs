//! Unified time axis across sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CombinedTable, TimeLabel};

/// Slots of one sheet on the unified axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSlots {
    pub sheet: String,
    /// Per axis label: index of the matching row in the combined table, or a gap.
    pub rows: Vec<Option<usize>>,
}

impl SheetSlots {
    /// Number of labels this sheet has no reading for.
    pub fn gap_count(&self) -> usize {
        self.rows.iter().filter(|slot| slot.is_none()).count()
    }
}

/// Sorted set of distinct time labels with a slot map per sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnifiedAxis {
    pub labels: Vec<TimeLabel>,
    pub sheets: Vec<SheetSlots>,
}

impl UnifiedAxis {
    /// Build the axis for a combined table, whatever its row order.
    ///
    /// When a sheet has several rows with the same label, the first one in
    /// source order occupies the slot.
    pub fn build(table: &CombinedTable) -> Self {
        let mut first: BTreeMap<(&str, &TimeLabel), (usize, usize)> = BTreeMap::new();
        for (idx, row) in table.rows.iter().enumerate() {
            first
                .entry((row.sheet.as_str(), &row.label))
                .and_modify(|slot| {
                    if row.source_row < slot.0 {
                        *slot = (row.source_row, idx);
                    }
                })
                .or_insert((row.source_row, idx));
        }

        let mut labels: Vec<&TimeLabel> = table.rows.iter().map(|r| &r.label).collect();
        labels.sort();
        labels.dedup();

        let sheets = table
            .sheets
            .iter()
            .map(|sheet| SheetSlots {
                sheet: sheet.clone(),
                rows: labels
                    .iter()
                    .map(|label| first.get(&(sheet.as_str(), *label)).map(|slot| slot.1))
                    .collect(),
            })
            .collect();

        Self {
            labels: labels.into_iter().cloned().collect(),
            sheets,
        }
    }

    /// Number of distinct labels on the axis.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Slot map of one sheet.
    pub fn slots(&self, sheet: &str) -> Option<&SheetSlots> {
        self.sheets.iter().find(|s| s.sheet == sheet)
    }

    /// Project a per-row column (indexed like the combined table's rows)
    /// onto the axis for one sheet. Gaps are NaN, never interpolated.
    pub fn project(&self, sheet: &str, values: &[f64]) -> Option<Vec<f64>> {
        let slots = self.slots(sheet)?;
        Some(
            slots
                .rows
                .iter()
                .map(|slot| slot.and_then(|i| values.get(i).copied()).unwrap_or(f64::NAN))
                .collect(),
        )
    }
}
