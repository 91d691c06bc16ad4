use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::{ONE_HUNDRED, annualize};

/// Validation failures for a single [`Bill`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillError {
    /// Monthly cost must not be negative.
    #[error("monthly cost must be non-negative, got {0}")]
    NegativeMonthlyCost(Decimal),

    /// Inflation rate must be a percentage between 0 and 100.
    #[error("inflation rate must be between 0 and 100 percent, got {0}")]
    InvalidInflationRate(Decimal),
}

/// A recurring bill the projected investment is expected to pay for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    /// Display name. May be empty; names are not required to be unique.
    pub name: String,

    /// Amount due every month.
    pub monthly_cost: Decimal,

    /// Expected yearly increase of the bill, in percent.
    ///
    /// Only consulted by the inflation-adjusted coverage policy.
    pub inflation_rate_percent: Decimal,
}

impl Bill {
    pub fn new(
        name: impl Into<String>,
        monthly_cost: Decimal,
        inflation_rate_percent: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            monthly_cost,
            inflation_rate_percent,
        }
    }

    /// Yearly cost of the bill (`monthly_cost * 12`).
    pub fn annual_cost(&self) -> Decimal {
        annualize(self.monthly_cost)
    }

    /// Checks the same bounds the input fields enforce.
    ///
    /// # Errors
    ///
    /// Returns [`BillError`] if the monthly cost is negative or the inflation
    /// rate falls outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), BillError> {
        if self.monthly_cost < Decimal::ZERO {
            return Err(BillError::NegativeMonthlyCost(self.monthly_cost));
        }
        if self.inflation_rate_percent < Decimal::ZERO
            || self.inflation_rate_percent > ONE_HUNDRED
        {
            return Err(BillError::InvalidInflationRate(
                self.inflation_rate_percent,
            ));
        }
        Ok(())
    }
}
