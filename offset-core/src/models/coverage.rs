use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BillId;

/// Whether the projected value pays for one bill for a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub bill_id: BillId,
    pub bill_name: String,

    /// Always `monthly_cost * 12`.
    pub annual_cost: Decimal,

    /// The amount the projected value was compared against.
    ///
    /// Equal to `annual_cost` under the nominal policy; grown by the bill's
    /// inflation rate under the inflation-adjusted policy.
    pub compared_cost: Decimal,

    pub is_covered: bool,
}

/// Coverage of every bill, in bill order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub results: Vec<CoverageResult>,

    /// True when every bill is covered. An empty report is fully covered.
    pub all_covered: bool,
}

impl Default for CoverageReport {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CoverageReport {
    pub fn new(results: Vec<CoverageResult>) -> Self {
        let all_covered = results.iter().all(|r| r.is_covered);
        Self {
            results,
            all_covered,
        }
    }

    pub fn covered_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_covered).count()
    }

    /// Sum of every bill's annual cost.
    pub fn total_annual_cost(&self) -> Decimal {
        self.results
            .iter()
            .fold(Decimal::ZERO, |total, r| total.saturating_add(r.annual_cost))
    }
}
