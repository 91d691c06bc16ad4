//! One-shot reports behind the `perpetuity` and `project` subcommands.

use anyhow::Context;
use offset_core::calculations::{
    CoveragePolicy, PerpetuityCalculator, PerpetuityError, PerpetuityInput, ProjectionCalculator,
};
use offset_core::{Bill, BillBook, InvestmentInput};
use serde_json::json;
use tracing::info;

use crate::views::{OutputFormat, perpetuity, projection, render_json};

/// Runs the perpetuity calculator and renders the result.
///
/// Insufficient input is not an error: the text report shows the input
/// prompt and the JSON report carries an `insufficient_input` status.
pub fn perpetuity_report(
    input: &PerpetuityInput,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let calculator = PerpetuityCalculator::new();

    match format {
        OutputFormat::Text => Ok(perpetuity::render(input, &calculator.figures(input))),
        OutputFormat::Json => {
            let value = match &calculator.calculate(input) {
                Ok(result) => json!({ "status": "ok", "input": input, "result": result }),
                Err(PerpetuityError::InsufficientInput { .. }) => json!({
                    "status": "insufficient_input",
                    "message": perpetuity::INSUFFICIENT_INPUT_PROMPT,
                }),
                Err(err @ PerpetuityError::Overflow) => anyhow::bail!("{err}"),
            };
            render_json(&value).context("failed to serialize perpetuity result")
        }
    }
}

/// Runs the projection calculator over `bills` and renders the result.
pub fn projection_report(
    investment: &InvestmentInput,
    years: u32,
    bills: Vec<Bill>,
    policy: CoveragePolicy,
    format: OutputFormat,
    ansi: bool,
) -> anyhow::Result<String> {
    let book = BillBook::from_bills(bills);
    let outcome = ProjectionCalculator::new(policy).calculate(investment, years, book.entries());
    if let Ok(result) = &outcome {
        info!(
            bills = book.len(),
            covered = result.coverage.covered_count(),
            all_covered = result.coverage.all_covered,
            "projection complete"
        );
    }

    match format {
        OutputFormat::Text => Ok(projection::render(&outcome, ansi)),
        OutputFormat::Json => {
            let result = outcome?;
            let value = json!({ "input": investment, "result": result });
            render_json(&value).context("failed to serialize projection result")
        }
    }
}
