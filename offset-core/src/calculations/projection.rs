//! Growth of a lump-sum investment and whether it covers a set of bills.
//!
//! The projection runs in three steps:
//!
//! 1. [`effective_roi`] – the yearly return left after tax on the gain.
//! 2. [`future_value`] – the amount after compounding that return for a
//!    number of years.
//! 3. [`evaluate_coverage_with_policy`] – which bills the future value pays
//!    for a year of.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use offset_core::{Bill, BillBook, InvestmentInput};
//! use offset_core::calculations::ProjectionCalculator;
//!
//! let investment = InvestmentInput::new(dec!(10000), dec!(10), dec!(20));
//! let bills = BillBook::from_bills([Bill::new("Internet", dec!(35), dec!(0))]);
//!
//! let result = ProjectionCalculator::default()
//!     .calculate(&investment, 1, bills.entries())
//!     .unwrap();
//!
//! assert_eq!(result.effective_roi, dec!(8));
//! assert_eq!(result.future_value, dec!(10800));
//! assert!(result.coverage.all_covered);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{ONE_HUNDRED, checked_powu, growth_factor, percent_to_rate};
use crate::calculations::coverage::{CoveragePolicy, evaluate_coverage_with_policy};
use crate::models::{BillEntry, CoverageReport, InvestmentInput};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// The compounded value exceeded the representable decimal range.
    #[error("projected value after {years} years is too large to represent")]
    Overflow { years: u32 },
}

/// Yearly return net of tax on the gain, in percent.
///
/// When the tax rate is positive and the amount is positive, the gain on
/// `investment_amount` is taxed and the remainder expressed as a percentage
/// of the amount. Otherwise there is no gain to tax and
/// `annual_return_percent` is returned unchanged.
///
/// ```
/// use rust_decimal_macros::dec;
/// use offset_core::calculations::effective_roi;
///
/// assert_eq!(effective_roi(dec!(10000), dec!(10), dec!(20)), dec!(8));
/// assert_eq!(effective_roi(dec!(10000), dec!(10), dec!(0)), dec!(10));
/// assert_eq!(effective_roi(dec!(0), dec!(10), dec!(20)), dec!(10));
/// ```
pub fn effective_roi(
    investment_amount: Decimal,
    annual_return_percent: Decimal,
    tax_rate_percent: Decimal,
) -> Decimal {
    if tax_rate_percent <= Decimal::ZERO {
        return annual_return_percent;
    }
    if investment_amount <= Decimal::ZERO {
        warn!(
            %investment_amount,
            %tax_rate_percent,
            "no investment to tax; using the pre-tax return"
        );
        return annual_return_percent;
    }

    let net = investment_amount
        .checked_mul(percent_to_rate(annual_return_percent))
        .and_then(|gain| {
            let tax = gain.checked_mul(percent_to_rate(tax_rate_percent))?;
            gain.checked_sub(tax)
        })
        .and_then(|net_gain| net_gain.checked_div(investment_amount))
        .and_then(|net_rate| net_rate.checked_mul(ONE_HUNDRED));

    // The gain can only overflow for absurd amounts; the rate itself is then
    // computed without going through the amount.
    net.unwrap_or_else(|| {
        annual_return_percent * (Decimal::ONE - percent_to_rate(tax_rate_percent))
    })
}

/// Value of `investment_amount` after compounding `effective_roi` percent
/// yearly for `years` years.
///
/// `years == 0` returns `investment_amount` exactly.
///
/// # Errors
///
/// Returns [`ProjectionError::Overflow`] if the value leaves the decimal
/// range.
///
/// ```
/// use rust_decimal_macros::dec;
/// use offset_core::calculations::future_value;
///
/// assert_eq!(future_value(dec!(10000), dec!(10), 10).unwrap(), dec!(25937.424601));
/// assert_eq!(future_value(dec!(10000), dec!(10), 0).unwrap(), dec!(10000));
/// ```
pub fn future_value(
    investment_amount: Decimal,
    effective_roi: Decimal,
    years: u32,
) -> Result<Decimal, ProjectionError> {
    if years == 0 {
        return Ok(investment_amount);
    }

    growth_factor(effective_roi)
        .and_then(|factor| checked_powu(factor, years))
        .and_then(|growth| investment_amount.checked_mul(growth))
        .ok_or(ProjectionError::Overflow { years })
}

/// Output of a full projection, unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Yearly return after tax, in percent.
    pub effective_roi: Decimal,

    /// Investment value at the end of the horizon.
    pub future_value: Decimal,

    pub years: u32,

    /// How bill costs were compared against the future value.
    pub policy: CoveragePolicy,

    pub coverage: CoverageReport,
}

/// Calculator for the projection and bill coverage.
///
/// The calculator holds only the [`CoveragePolicy`]; inputs are passed to
/// every call and nothing is retained between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionCalculator {
    policy: CoveragePolicy,
}

impl ProjectionCalculator {
    pub fn new(policy: CoveragePolicy) -> Self {
        Self { policy }
    }

    /// Projects `investment` over `years` and checks coverage of `bills`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Overflow`] if the future value cannot be
    /// represented.
    pub fn calculate(
        &self,
        investment: &InvestmentInput,
        years: u32,
        bills: &[BillEntry],
    ) -> Result<ProjectionResult, ProjectionError> {
        let effective_roi = effective_roi(
            investment.amount,
            investment.annual_return_percent,
            investment.tax_rate_percent,
        );
        let future_value = future_value(investment.amount, effective_roi, years)?;

        debug!(
            amount = %investment.amount,
            %effective_roi,
            years,
            %future_value,
            "projection calculated"
        );

        let coverage = evaluate_coverage_with_policy(future_value, bills, self.policy, years);

        Ok(ProjectionResult {
            effective_roi,
            future_value,
            years,
            policy: self.policy,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::models::{Bill, BillBook};

    /// Initializes tracing subscriber for tests that exercise warning paths.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // effective_roi tests
    // =========================================================================

    #[test]
    fn effective_roi_without_tax_is_return_rate() {
        for roi in [dec!(0), dec!(3.7), dec!(10), dec!(250)] {
            assert_eq!(effective_roi(dec!(12345.67), roi, dec!(0)), roi);
        }
    }

    #[test]
    fn effective_roi_applies_tax_to_gain() {
        let result = effective_roi(dec!(10000), dec!(10), dec!(20));

        assert_eq!(result, dec!(8.0));
    }

    #[test]
    fn effective_roi_full_tax_leaves_nothing() {
        let result = effective_roi(dec!(5000), dec!(7), dec!(100));

        assert_eq!(result, dec!(0));
    }

    #[test]
    fn effective_roi_zero_amount_short_circuits() {
        let _guard = init_test_tracing();

        let result = effective_roi(dec!(0), dec!(10), dec!(20));

        assert_eq!(result, dec!(10));
    }

    #[test]
    fn effective_roi_falls_back_when_gain_overflows() {
        let result = effective_roi(Decimal::MAX, dec!(1000), dec!(50));

        assert_eq!(result, dec!(500));
    }

    // =========================================================================
    // future_value tests
    // =========================================================================

    #[test]
    fn future_value_zero_years_is_amount() {
        assert_eq!(future_value(dec!(1234.56), dec!(9), 0), Ok(dec!(1234.56)));
    }

    #[test]
    fn future_value_compounds_yearly() {
        let value = future_value(dec!(10000), dec!(10), 10).unwrap();

        assert_eq!(value.round_dp(2), dec!(25937.42));
    }

    #[test]
    fn future_value_zero_return_is_flat() {
        assert_eq!(future_value(dec!(500), dec!(0), 30), Ok(dec!(500)));
    }

    #[test]
    fn future_value_reports_overflow() {
        let result = future_value(dec!(1000000), dec!(100), 200);

        assert_eq!(result, Err(ProjectionError::Overflow { years: 200 }));
    }

    // =========================================================================
    // ProjectionCalculator tests
    // =========================================================================

    #[test]
    fn calculate_without_tax() {
        let investment = InvestmentInput::new(dec!(10000), dec!(10), dec!(0));

        let result = ProjectionCalculator::default()
            .calculate(&investment, 10, &[])
            .unwrap();

        assert_eq!(result.effective_roi, dec!(10));
        assert_eq!(result.future_value.round_dp(2), dec!(25937.42));
        assert!(result.coverage.all_covered);
    }

    #[test]
    fn calculate_with_tax_and_one_bill() {
        let investment = InvestmentInput::new(dec!(10000), dec!(10), dec!(20));
        let bills = BillBook::from_bills([Bill::new("Internet", dec!(35), dec!(0))]);

        let result = ProjectionCalculator::default()
            .calculate(&investment, 1, bills.entries())
            .unwrap();

        assert_eq!(result.effective_roi, dec!(8.0));
        assert_eq!(result.future_value, dec!(10800.00));
        assert_eq!(result.coverage.results[0].annual_cost, dec!(420.00));
        assert!(result.coverage.results[0].is_covered);
        assert!(result.coverage.all_covered);
    }

    #[test]
    fn calculate_uses_configured_policy() {
        let investment = InvestmentInput::new(dec!(1000), dec!(0), dec!(0));
        let bills = BillBook::from_bills([Bill::new("Phone", dec!(80), dec!(5))]);
        let calculator = ProjectionCalculator::new(CoveragePolicy::InflationAdjusted);

        let result = calculator.calculate(&investment, 3, bills.entries()).unwrap();

        // 960 × 1.05³ = 1111.32
        assert_eq!(result.policy, CoveragePolicy::InflationAdjusted);
        assert_eq!(result.coverage.results[0].compared_cost, dec!(1111.32));
        assert!(!result.coverage.all_covered);
    }

    #[test]
    fn calculate_zero_amount_with_tax_does_not_fault() {
        let investment = InvestmentInput::new(dec!(0), dec!(10), dec!(20));
        let bills = BillBook::from_bills([Bill::new("Water", dec!(20), dec!(0))]);

        let result = ProjectionCalculator::default()
            .calculate(&investment, 5, bills.entries())
            .unwrap();

        assert_eq!(result.effective_roi, dec!(10));
        assert_eq!(result.future_value, dec!(0));
        assert!(!result.coverage.all_covered);
    }
}
