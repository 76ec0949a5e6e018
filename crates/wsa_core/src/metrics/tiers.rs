//! Production-quantity tiers.

use serde::{Deserialize, Serialize};

use crate::models::NumericColumn;

use super::derived::{column_values, DerivedMetricRow};
use super::stats::{self, ColumnStats};

/// Tertile bucket of production quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuantityTier {
    Low,
    Medium,
    High,
}

impl QuantityTier {
    /// Tiers from low to high.
    pub fn all() -> &'static [QuantityTier] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

impl std::fmt::Display for QuantityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Bin edges at the 0, 1/3, 2/3 and 1 quantiles.
///
/// `None` when the edges are not strictly increasing (too few distinct
/// quantities to split into three bins).
pub fn tertile_edges(quantity: &[f64]) -> Option<[f64; 4]> {
    let edges = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0].map(|q| stats::quantile(quantity, q));
    edges
        .windows(2)
        .all(|w| w[0] < w[1])
        .then_some(edges)
}

/// Tier of one quantity. The lowest bin includes its lower edge.
pub fn assign_tier(quantity: f64, edges: &[f64; 4]) -> Option<QuantityTier> {
    if quantity.is_nan() || quantity < edges[0] || quantity > edges[3] {
        None
    } else if quantity <= edges[1] {
        Some(QuantityTier::Low)
    } else if quantity <= edges[2] {
        Some(QuantityTier::Medium)
    } else {
        Some(QuantityTier::High)
    }
}

/// Per-unit statistics of one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub tier: QuantityTier,
    pub rows: usize,
    pub metric_a_per_unit: ColumnStats,
    pub metric_b_per_unit: ColumnStats,
}

/// Tier edges and per-tier statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub edges: [f64; 4],
    pub tiers: Vec<TierStats>,
}

impl TierBreakdown {
    /// Split rows into quantity tiers; `None` when no tiering is possible.
    pub fn build(rows: &[&DerivedMetricRow]) -> Option<Self> {
        let edges = tertile_edges(&column_values(rows, NumericColumn::Quantity))?;
        let tiers = QuantityTier::all()
            .iter()
            .map(|&tier| {
                let members: Vec<&DerivedMetricRow> = rows
                    .iter()
                    .copied()
                    .filter(|r| assign_tier(r.row.quantity, &edges) == Some(tier))
                    .collect();
                TierStats {
                    tier,
                    rows: members.len(),
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
            .collect();
        Some(Self { edges, tiers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DerivedTable;
    use crate::models::{AlignmentMode, CombinedTable, NormalizedRow, TimeLabel};

    fn table(quantities: &[f64]) -> DerivedTable {
        let rows = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| NormalizedRow {
                sheet: "A".into(),
                source_row: i,
                label: TimeLabel::from_minutes(i as i64),
                instant: None,
                quantity: *q,
                metric_a: 2.0 * q,
                metric_b: *q,
                date_label: String::new(),
                sensor_type: String::new(),
                time_key: String::new(),
                elapsed_minutes: None,
            })
            .collect();
        DerivedTable::from_combined(&CombinedTable {
            mode: AlignmentMode::SheetKeyed,
            sheets: vec!["A".into()],
            rows,
        })
    }

    #[test]
    fn edges_are_tertiles() {
        let edges = tertile_edges(&[0.0, 3.0, 6.0, 9.0]).unwrap();
        assert_eq!(edges, [0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn collapsed_edges_disable_tiering() {
        assert!(tertile_edges(&[5.0, 5.0, 5.0]).is_none());
        assert!(tertile_edges(&[0.0, 0.0, 0.0, 10.0]).is_none());
        assert!(tertile_edges(&[]).is_none());
    }

    #[test]
    fn tier_assignment_bounds() {
        let edges = [0.0, 3.0, 6.0, 9.0];
        assert_eq!(assign_tier(0.0, &edges), Some(QuantityTier::Low));
        assert_eq!(assign_tier(3.0, &edges), Some(QuantityTier::Low));
        assert_eq!(assign_tier(3.5, &edges), Some(QuantityTier::Medium));
        assert_eq!(assign_tier(9.0, &edges), Some(QuantityTier::High));
        assert_eq!(assign_tier(f64::NAN, &edges), None);
    }

    #[test]
    fn breakdown_groups_rows() {
        let t = table(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let breakdown = TierBreakdown::build(&t.all_rows()).unwrap();
        let counts: Vec<usize> = breakdown.tiers.iter().map(|t| t.rows).collect();
        assert_eq!(counts.iter().sum::<usize>(), 7);
        assert_eq!(counts, [3, 2, 2]);
        assert_eq!(breakdown.tiers[0].metric_a_per_unit.mean, 2.0);
        assert_eq!(breakdown.tiers[2].metric_b_per_unit.mean, 1.0);
    }
}
