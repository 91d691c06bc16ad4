//! Comparison of a projected investment value against recurring bills.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{checked_powu, growth_factor};
use crate::models::{BillEntry, CoverageReport, CoverageResult};

/// What each bill's yearly cost is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Today's annual cost. Each bill's inflation rate is ignored.
    #[default]
    Nominal,

    /// Annual cost grown by the bill's own inflation rate over the
    /// projection horizon.
    InflationAdjusted,
}

/// Reports which bills a projected value covers, using today's annual costs.
///
/// Each bill is covered when `future_value >= monthly_cost * 12`. The bills'
/// inflation rates are not consulted; see [`evaluate_coverage_with_policy`]
/// for the inflation-adjusted comparison.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use offset_core::{Bill, BillBook};
/// use offset_core::calculations::evaluate_coverage;
///
/// let book = BillBook::from_bills([
///     Bill::new("Internet", dec!(35), dec!(0)),
///     Bill::new("Rent", dec!(2000), dec!(0)),
/// ]);
///
/// let report = evaluate_coverage(dec!(10800), book.entries());
///
/// assert!(report.results[0].is_covered);
/// assert!(!report.results[1].is_covered);
/// assert!(!report.all_covered);
/// ```
pub fn evaluate_coverage(
    future_value: Decimal,
    bills: &[BillEntry],
) -> CoverageReport {
    evaluate_coverage_with_policy(future_value, bills, CoveragePolicy::Nominal, 0)
}

/// Reports which bills a projected value covers under `policy`.
///
/// With [`CoveragePolicy::InflationAdjusted`] each bill's annual cost is grown
/// by `(1 + inflation%)^years` before the comparison. A grown cost that leaves
/// the decimal range saturates, which marks the bill as not covered.
pub fn evaluate_coverage_with_policy(
    future_value: Decimal,
    bills: &[BillEntry],
    policy: CoveragePolicy,
    years: u32,
) -> CoverageReport {
    let results = bills
        .iter()
        .map(|entry| {
            let annual_cost = entry.bill.annual_cost();
            let compared_cost = match policy {
                CoveragePolicy::Nominal => annual_cost,
                CoveragePolicy::InflationAdjusted => {
                    inflate(annual_cost, entry.bill.inflation_rate_percent, years)
                }
            };

            CoverageResult {
                bill_id: entry.id,
                bill_name: entry.bill.name.clone(),
                annual_cost,
                compared_cost,
                is_covered: future_value >= compared_cost,
            }
        })
        .collect();

    let report = CoverageReport::new(results);
    debug!(
        bills = report.results.len(),
        covered = report.covered_count(),
        all_covered = report.all_covered,
        ?policy,
        "coverage evaluated"
    );
    report
}

fn inflate(
    annual_cost: Decimal,
    inflation_rate_percent: Decimal,
    years: u32,
) -> Decimal {
    growth_factor(inflation_rate_percent)
        .and_then(|factor| checked_powu(factor, years))
        .and_then(|growth| annual_cost.checked_mul(growth))
        .unwrap_or(Decimal::MAX)
}
