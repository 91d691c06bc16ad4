use std::fmt::Write;

use offset_core::calculations::common::nearest_f64;
use offset_core::calculations::{PerpetuityError, PerpetuityFigures, PerpetuityInput};

use crate::format::{format_currency, format_rate_input};

/// Shown instead of results when the monthly bill or return rate is missing.
pub const INSUFFICIENT_INPUT_PROMPT: &str = "Please enter valid values for your monthly bill, expected return rate, inflation rate, and tax rate.";

/// Renders the perpetuity figures, or a prompt when they cannot be computed.
pub fn render(
    input: &PerpetuityInput,
    outcome: &Result<PerpetuityFigures, PerpetuityError>,
) -> String {
    let figures = match outcome {
        Ok(figures) => figures,
        Err(PerpetuityError::InsufficientInput { .. }) => {
            return format!("{INSUFFICIENT_INPUT_PROMPT}\n");
        }
        Err(err @ PerpetuityError::Overflow) => return format!("{err}\n"),
    };

    let mut out = String::new();
    let rows = [
        ("Annual Bill".to_string(), figures.annual_bill),
        (
            "Inflation-Adjusted Annual Bill".to_string(),
            figures.inflation_adjusted_annual_bill,
        ),
        (
            "Required Investment (before tax)".to_string(),
            figures.required_before_tax,
        ),
        (
            format!(
                "Taxes on Withdrawal (at {})",
                format_rate_input(nearest_f64(input.tax_rate_percent))
            ),
            figures.tax_on_withdrawal,
        ),
        (
            "Required Investment (after tax)".to_string(),
            figures.required_after_tax,
        ),
    ];
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<width$}  {}", format_currency(value));
    }
    out
}
