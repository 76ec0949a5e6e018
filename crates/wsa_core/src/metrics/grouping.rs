//! Per-unit signal grouped by time of day and sensor type.
//!
//! Rows from every selected sheet that share a time label and a sensor
//! type fall into one group, whatever their date. This is the data behind
//! a "signal per unit by time of day" box plot: one box per label, one
//! colour per sensor type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{NumericColumn, TimeLabel};

use super::derived::{column_values, DerivedMetricRow};
use super::stats::ColumnStats;

/// Per-unit statistics of one (time label, sensor type) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayGroup {
    pub label: TimeLabel,
    pub sensor_type: String,
    /// Rows in the group, including rows whose per-unit values are missing.
    pub rows: usize,
    /// Date labels that contributed rows, sorted.
    pub dates: Vec<String>,
    pub metric_a_per_unit: ColumnStats,
    pub metric_b_per_unit: ColumnStats,
}

/// Group rows by (time label, sensor type).
///
/// Groups are ordered by label, then sensor type. Pure function - no I/O.
pub fn group_by_time_of_day(rows: &[&DerivedMetricRow]) -> Vec<TimeOfDayGroup> {
    let mut groups: BTreeMap<(&TimeLabel, &str), Vec<&DerivedMetricRow>> = BTreeMap::new();
    for &row in rows {
        groups
            .entry((&row.row.label, row.row.sensor_type.as_str()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((label, sensor_type), members)| {
            let mut dates: Vec<String> = members.iter().map(|r| r.row.date_label.clone()).collect();
            dates.sort();
            dates.dedup();
            TimeOfDayGroup {
                label: label.clone(),
                sensor_type: sensor_type.to_string(),
                rows: members.len(),
                dates,
                metric_a_per_unit: ColumnStats::describe(&column_values(
                    &members,
                    NumericColumn::MetricAPerUnit,
                )),
                metric_b_per_unit: ColumnStats::describe(&column_values(
                    &members,
                    NumericColumn::MetricBPerUnit,
                )),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedRow;

    fn row(date: &str, sensor: &str, minutes: i64, quantity: f64, a: f64) -> DerivedMetricRow {
        DerivedMetricRow::from_row(NormalizedRow {
            sheet: format!("{date}_{sensor}"),
            source_row: 0,
            label: TimeLabel::from_minutes(minutes),
            instant: None,
            quantity,
            metric_a: a,
            metric_b: a / 2.0,
            date_label: date.into(),
            sensor_type: sensor.into(),
            time_key: String::new(),
            elapsed_minutes: None,
        })
    }

    #[test]
    fn groups_span_dates_but_not_sensor_types() {
        let rows = [
            row("0526", "RH", 540, 2.0, 4.0),
            row("0528", "RH", 540, 2.0, 8.0),
            row("0526", "LH", 540, 1.0, 1.0),
            row("0526", "RH", 545, 0.0, 3.0),
        ];
        let refs: Vec<&DerivedMetricRow> = rows.iter().collect();
        let groups = group_by_time_of_day(&refs);

        let keys: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| (g.label.as_str(), g.sensor_type.as_str()))
            .collect();
        assert_eq!(keys, [("09:00", "LH"), ("09:00", "RH"), ("09:05", "RH")]);

        let rh = &groups[1];
        assert_eq!(rh.rows, 2);
        assert_eq!(rh.dates, ["0526", "0528"]);
        assert_eq!(rh.metric_a_per_unit.mean, 3.0);
        assert_eq!(rh.metric_b_per_unit.max, 2.0);
    }

    #[test]
    fn zero_quantity_group_has_no_per_unit_values() {
        let rows = [row("0526", "RH", 545, 0.0, 3.0)];
        let refs: Vec<&DerivedMetricRow> = rows.iter().collect();
        let groups = group_by_time_of_day(&refs);
        assert_eq!(groups[0].rows, 1);
        assert_eq!(groups[0].metric_a_per_unit.count, 0);
        assert!(groups[0].metric_a_per_unit.mean.is_nan());
    }

    #[test]
    fn no_rows_no_groups() {
        assert!(group_by_time_of_day(&[]).is_empty());
    }
}
