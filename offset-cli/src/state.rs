//! In-memory state of one calculator session.
//!
//! Nothing here outlives the process; the session rebuilds its outputs from
//! this state after every edit.

use offset_core::BillBook;
use offset_core::InvestmentInput;
use offset_core::calculations::{
    CoveragePolicy, PerpetuityCalculator, PerpetuityError, PerpetuityFigures, PerpetuityInput,
    ProjectionCalculator, ProjectionError, ProjectionResult,
};
use rust_decimal::Decimal;

use crate::config::Config;

/// Inputs of both calculators plus the bill list.
#[derive(Debug, Clone)]
pub struct AppState {
    pub perpetuity: PerpetuityInput,
    pub investment: InvestmentInput,
    pub years: u32,
    pub bills: BillBook,
    pub policy: CoveragePolicy,
}

impl AppState {
    /// Starts a session with the rates from `config` and no bills.
    pub fn new(config: &Config) -> Self {
        Self {
            perpetuity: PerpetuityInput {
                monthly_bill: Decimal::ZERO,
                annual_return_percent: config.return_rate.unwrap_or_default(),
                inflation_rate_percent: config.inflation_rate,
                tax_rate_percent: config.tax_rate,
            },
            investment: InvestmentInput::new(
                Decimal::ZERO,
                config.roi.unwrap_or_default(),
                config.projection_tax_rate,
            ),
            years: config.years,
            bills: BillBook::new(),
            policy: policy_for(config.apply_bill_inflation),
        }
    }

    pub fn perpetuity_figures(&self) -> Result<PerpetuityFigures, PerpetuityError> {
        PerpetuityCalculator::new().figures(&self.perpetuity)
    }

    pub fn projection_result(&self) -> Result<ProjectionResult, ProjectionError> {
        ProjectionCalculator::new(self.policy).calculate(
            &self.investment,
            self.years,
            self.bills.entries(),
        )
    }
}

/// Maps the `apply_bill_inflation` switch onto a coverage policy.
pub fn policy_for(apply_bill_inflation: bool) -> CoveragePolicy {
    if apply_bill_inflation {
        CoveragePolicy::InflationAdjusted
    } else {
        CoveragePolicy::Nominal
    }
}
