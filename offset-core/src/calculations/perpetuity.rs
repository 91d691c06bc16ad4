//! Lump sum needed to pay one recurring bill forever.
//!
//! The investment is sized so that a single year of returns pays a year of
//! the bill, after inflation and (optionally) the tax owed on withdrawals.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Annual bill: monthly bill × 12 |
//! | 2    | Inflation-adjusted bill: step 1 × (1 + inflation%) |
//! | 3    | Tax on withdrawal: step 2 × tax% |
//! | 4    | Required before tax: step 2 ÷ return% |
//! | 5    | Required after tax: (step 2 + step 3) ÷ return% |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use offset_core::calculations::{PerpetuityCalculator, PerpetuityInput};
//!
//! let input = PerpetuityInput {
//!     monthly_bill: dec!(100),
//!     annual_return_percent: dec!(5),
//!     inflation_rate_percent: dec!(3),
//!     tax_rate_percent: dec!(20),
//! };
//!
//! let result = PerpetuityCalculator::new().calculate(&input).unwrap();
//!
//! assert_eq!(result.inflation_adjusted_annual_bill, dec!(1236));
//! assert_eq!(result.required_after_tax, dec!(29664));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{MONTHS_PER_YEAR, growth_factor, nearest_f64, percent_to_rate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PerpetuityError {
    /// The monthly bill and the return rate must both be strictly positive.
    #[error(
        "insufficient input: monthly bill ({monthly_bill}) and return rate ({annual_return_percent}) must both be positive"
    )]
    InsufficientInput {
        monthly_bill: Decimal,
        annual_return_percent: Decimal,
    },

    /// An intermediate value exceeded the representable decimal range.
    #[error("required investment is too large to represent")]
    Overflow,
}

/// Inputs for the perpetuity calculation. Rates are percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpetuityInput {
    pub monthly_bill: Decimal,
    pub annual_return_percent: Decimal,
    pub inflation_rate_percent: Decimal,
    pub tax_rate_percent: Decimal,
}

impl PerpetuityInput {
    /// Whether the calculation can run: bill and return rate must be positive.
    pub fn is_sufficient(&self) -> bool {
        self.monthly_bill > Decimal::ZERO && self.annual_return_percent > Decimal::ZERO
    }
}

/// Output of the perpetuity calculation, unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpetuityResult {
    /// Monthly bill × 12.
    pub annual_bill: Decimal,

    /// Annual bill grown by one year of inflation.
    pub inflation_adjusted_annual_bill: Decimal,

    /// Investment whose yearly return equals the inflation-adjusted bill.
    pub required_before_tax: Decimal,

    /// Investment whose yearly return also pays the withdrawal tax.
    pub required_after_tax: Decimal,

    /// Tax owed on withdrawing one year of the inflation-adjusted bill.
    pub tax_on_withdrawal: Decimal,
}

/// The perpetuity figures evaluated in binary floating point.
///
/// These are the values shown to a user. Each step runs in the same order as
/// [`PerpetuityCalculator::calculate`], so the `f64` rounding at every step
/// is reproduced and two-decimal output shows the same cents an `f64`
/// evaluation of the formulas does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerpetuityFigures {
    pub annual_bill: f64,
    pub inflation_adjusted_annual_bill: f64,
    pub required_before_tax: f64,
    pub required_after_tax: f64,
    pub tax_on_withdrawal: f64,
}

/// Calculator for the perpetuity (required investment) figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerpetuityCalculator;

impl PerpetuityCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes the required investment for `input`.
    ///
    /// # Errors
    ///
    /// - [`PerpetuityError::InsufficientInput`] if the monthly bill or the
    ///   return rate is not strictly positive. Nothing is computed.
    /// - [`PerpetuityError::Overflow`] if a value leaves the decimal range.
    ///
    /// # Example: insufficient input
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use offset_core::calculations::{PerpetuityCalculator, PerpetuityError, PerpetuityInput};
    ///
    /// let input = PerpetuityInput {
    ///     monthly_bill: dec!(100),
    ///     annual_return_percent: dec!(0),
    ///     ..Default::default()
    /// };
    ///
    /// let result = PerpetuityCalculator::new().calculate(&input);
    ///
    /// assert!(matches!(result, Err(PerpetuityError::InsufficientInput { .. })));
    /// ```
    pub fn calculate(
        &self,
        input: &PerpetuityInput,
    ) -> Result<PerpetuityResult, PerpetuityError> {
        if !input.is_sufficient() {
            warn!(
                monthly_bill = %input.monthly_bill,
                annual_return_percent = %input.annual_return_percent,
                "monthly bill and return rate must be positive; skipping calculation"
            );
            return Err(PerpetuityError::InsufficientInput {
                monthly_bill: input.monthly_bill,
                annual_return_percent: input.annual_return_percent,
            });
        }

        // Step 1
        let annual_bill = input
            .monthly_bill
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(PerpetuityError::Overflow)?;

        // Step 2
        let inflation_adjusted_annual_bill = growth_factor(input.inflation_rate_percent)
            .and_then(|factor| annual_bill.checked_mul(factor))
            .ok_or(PerpetuityError::Overflow)?;

        // Step 3
        let tax_on_withdrawal = inflation_adjusted_annual_bill
            .checked_mul(percent_to_rate(input.tax_rate_percent))
            .ok_or(PerpetuityError::Overflow)?;

        // Steps 4 and 5; the return rate is known to be positive here
        let return_rate = percent_to_rate(input.annual_return_percent);
        let required_before_tax = inflation_adjusted_annual_bill
            .checked_div(return_rate)
            .ok_or(PerpetuityError::Overflow)?;
        let required_after_tax = inflation_adjusted_annual_bill
            .checked_add(tax_on_withdrawal)
            .and_then(|gross| gross.checked_div(return_rate))
            .ok_or(PerpetuityError::Overflow)?;

        debug!(
            %annual_bill,
            %inflation_adjusted_annual_bill,
            %required_before_tax,
            %required_after_tax,
            "perpetuity calculated"
        );

        Ok(PerpetuityResult {
            annual_bill,
            inflation_adjusted_annual_bill,
            required_before_tax,
            required_after_tax,
            tax_on_withdrawal,
        })
    }

    /// Computes the display figures for `input` in `f64`.
    ///
    /// # Errors
    ///
    /// Figures are only produced for inputs [`calculate`](Self::calculate)
    /// accepts, and fail with the same errors.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use offset_core::calculations::{PerpetuityCalculator, PerpetuityInput};
    ///
    /// let input = PerpetuityInput {
    ///     monthly_bill: dec!(12.5),
    ///     annual_return_percent: dec!(8),
    ///     inflation_rate_percent: dec!(0),
    ///     tax_rate_percent: dec!(1.5),
    /// };
    ///
    /// let figures = PerpetuityCalculator::new().figures(&input).unwrap();
    ///
    /// assert_eq!(format!("{:.2}", figures.required_after_tax), "1903.12");
    /// ```
    pub fn figures(
        &self,
        input: &PerpetuityInput,
    ) -> Result<PerpetuityFigures, PerpetuityError> {
        self.calculate(input)?;

        let monthly_bill = nearest_f64(input.monthly_bill);
        let return_percent = nearest_f64(input.annual_return_percent);
        let inflation_percent = nearest_f64(input.inflation_rate_percent);
        let tax_percent = nearest_f64(input.tax_rate_percent);

        let annual_bill = monthly_bill * 12.0;
        let inflation_adjusted_annual_bill = annual_bill * (1.0 + inflation_percent / 100.0);
        let tax_on_withdrawal = inflation_adjusted_annual_bill * (tax_percent / 100.0);
        let required_before_tax = inflation_adjusted_annual_bill / (return_percent / 100.0);
        let required_after_tax =
            (inflation_adjusted_annual_bill + tax_on_withdrawal) / (return_percent / 100.0);

        Ok(PerpetuityFigures {
            annual_bill,
            inflation_adjusted_annual_bill,
            required_before_tax,
            required_after_tax,
            tax_on_withdrawal,
        })
    }
}
