use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::ONE_HUNDRED;

/// Validation failures for an [`InvestmentInput`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvestmentError {
    #[error("investment amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("annual return must be non-negative, got {0}")]
    NegativeReturn(Decimal),

    #[error("tax rate must be between 0 and 100 percent, got {0}")]
    InvalidTaxRate(Decimal),
}

/// Lump-sum investment used by the projection calculator.
///
/// Re-read on every recompute; nothing here is retained between evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentInput {
    /// Amount invested today.
    pub amount: Decimal,

    /// Expected yearly return before tax, in percent.
    pub annual_return_percent: Decimal,

    /// Tax charged on investment gains, in percent.
    pub tax_rate_percent: Decimal,
}

impl InvestmentInput {
    pub fn new(
        amount: Decimal,
        annual_return_percent: Decimal,
        tax_rate_percent: Decimal,
    ) -> Self {
        Self {
            amount,
            annual_return_percent,
            tax_rate_percent,
        }
    }

    /// Checks the same bounds the input fields enforce.
    ///
    /// # Errors
    ///
    /// Returns [`InvestmentError`] for a negative amount or return, or a tax
    /// rate outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), InvestmentError> {
        if self.amount < Decimal::ZERO {
            return Err(InvestmentError::NegativeAmount(self.amount));
        }
        if self.annual_return_percent < Decimal::ZERO {
            return Err(InvestmentError::NegativeReturn(
                self.annual_return_percent,
            ));
        }
        if self.tax_rate_percent < Decimal::ZERO || self.tax_rate_percent > ONE_HUNDRED {
            return Err(InvestmentError::InvalidTaxRate(self.tax_rate_percent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_input() -> InvestmentInput {
        InvestmentInput::new(dec!(10000), dec!(10), dec!(20))
    }

    #[test]
    fn validate_accepts_valid_input() {
        assert_eq!(test_input().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_zero_amount() {
        let input = InvestmentInput {
            amount: Decimal::ZERO,
            ..test_input()
        };

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let input = InvestmentInput {
            amount: dec!(-5),
            ..test_input()
        };

        assert_eq!(input.validate(), Err(InvestmentError::NegativeAmount(dec!(-5))));
    }

    #[test]
    fn validate_rejects_negative_return() {
        let input = InvestmentInput {
            annual_return_percent: dec!(-0.5),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(InvestmentError::NegativeReturn(dec!(-0.5)))
        );
    }

    #[test]
    fn validate_rejects_tax_rate_above_one_hundred() {
        let input = InvestmentInput {
            tax_rate_percent: dec!(101),
            ..test_input()
        };

        assert_eq!(
            input.validate(),
            Err(InvestmentError::InvalidTaxRate(dec!(101)))
        );
    }
}
