//! Tabular model shared by the alignment, metrics and correlation stages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::{AlignmentMode, NumericEncoding};

/// Canonical time label of a row.
///
/// Normally zero-padded `HH:MM`, so lexicographic order is chronological
/// order within a day. Timestamps that could not be parsed keep their
/// literal text and sort among the others as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeLabel(String);

impl TimeLabel {
    /// Build an `HH:MM` label from a minute of the day (wraps at 24h).
    pub fn from_minutes(minutes: i64) -> Self {
        let minutes = minutes.rem_euclid(24 * 60);
        Self(format!("{:02}:{:02}", minutes / 60, minutes % 60))
    }

    /// Keep an unparseable timestamp as-is.
    pub fn literal(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Minute of the day if this is a canonical `HH:MM` label.
    pub fn minutes_of_day(&self) -> Option<u32> {
        let (h, m) = self.0.split_once(':')?;
        if h.len() != 2 || m.len() != 2 {
            return None;
        }
        let h: u32 = h.parse().ok()?;
        let m: u32 = m.parse().ok()?;
        (h < 24 && m < 60).then_some(h * 60 + m)
    }
}

impl std::fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One reading after timestamp normalization, tagged with its sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Source sheet name.
    pub sheet: String,
    /// 0-based data row index within the source sheet (header excluded).
    pub source_row: usize,
    /// Canonical time label.
    pub label: TimeLabel,
    /// Absolute instant, when the source carried a date.
    pub instant: Option<NaiveDateTime>,
    pub quantity: f64,
    pub metric_a: f64,
    pub metric_b: f64,
    /// Date label taken from the sheet name.
    pub date_label: String,
    /// Sensor type taken from the sheet name.
    pub sensor_type: String,
    /// Composite `"{sheet}_{label}"` key.
    pub time_key: String,
    /// Minutes since the sheet's first reading.
    pub elapsed_minutes: Option<f64>,
}

/// All normalized rows of one sheet, before merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    pub sheet: String,
    pub rows: Vec<NormalizedRow>,
    /// Rows dropped because they had no timestamp.
    pub dropped_rows: usize,
    /// Encoding applied to numeric timestamps in this sheet.
    pub encoding: NumericEncoding,
}

impl SheetTable {
    /// Rows that survived normalization.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows of every selected sheet merged under one alignment mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTable {
    /// Alignment that produced the row order.
    pub mode: AlignmentMode,
    /// Sheets that contributed rows, in selection order.
    pub sheets: Vec<String>,
    /// Rows in alignment order.
    pub rows: Vec<NormalizedRow>,
}

impl CombinedTable {
    /// An empty table (idle state).
    pub fn empty(mode: AlignmentMode) -> Self {
        Self {
            mode,
            sheets: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of quantity over all rows, skipping missing values. Zero for an
    /// empty table.
    pub fn total_quantity(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.quantity)
            .filter(|q| !q.is_nan())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_minutes_pads_and_wraps() {
        assert_eq!(TimeLabel::from_minutes(545).as_str(), "09:05");
        assert_eq!(TimeLabel::from_minutes(1440).as_str(), "00:00");
        assert_eq!(TimeLabel::from_minutes(-5).as_str(), "23:55");
    }

    #[test]
    fn label_minutes_round_trip() {
        assert_eq!(TimeLabel::from_minutes(605).minutes_of_day(), Some(605));
        assert_eq!(TimeLabel::literal("shift A").minutes_of_day(), None);
        assert_eq!(TimeLabel::literal("9:05").minutes_of_day(), None);
    }

    #[test]
    fn labels_sort_chronologically() {
        let mut labels = vec![
            TimeLabel::from_minutes(600),
            TimeLabel::from_minutes(59),
            TimeLabel::from_minutes(545),
        ];
        labels.sort();
        let strs: Vec<_> = labels.iter().map(|l| l.as_str()).collect();
        assert_eq!(strs, ["00:59", "09:05", "10:00"]);
    }

    fn row_with_quantity(quantity: f64) -> NormalizedRow {
        NormalizedRow {
            sheet: "0526_RH".into(),
            source_row: 0,
            label: TimeLabel::from_minutes(540),
            instant: None,
            quantity,
            metric_a: 1.0,
            metric_b: 1.0,
            date_label: "0526".into(),
            sensor_type: "RH".into(),
            time_key: "0526_RH_09:00".into(),
            elapsed_minutes: None,
        }
    }

    #[test]
    fn total_quantity_skips_missing() {
        let mut table = CombinedTable::empty(AlignmentMode::RawAppend);
        assert_eq!(table.total_quantity(), 0.0);

        table.rows = vec![
            row_with_quantity(4.0),
            row_with_quantity(f64::NAN),
            row_with_quantity(2.5),
        ];
        assert_eq!(table.total_quantity(), 6.5);
    }
}
