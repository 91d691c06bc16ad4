//! Horizontal bar chart of bill costs, colored by coverage.

use std::fmt::Write;

use offset_core::CoverageResult;
use offset_core::calculations::common::nearest_f64;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::format::format_currency;

/// Width, in characters, of the longest bar.
pub const BAR_WIDTH: usize = 40;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Number of bar cells for `cost` when `max_cost` fills [`BAR_WIDTH`].
///
/// Any positive cost gets at least one cell so it stays visible.
fn bar_len(
    cost: Decimal,
    max_cost: Decimal,
) -> usize {
    if cost <= Decimal::ZERO || max_cost <= Decimal::ZERO {
        return 0;
    }
    let scaled = (cost / max_cost * Decimal::from(BAR_WIDTH)).round();
    scaled.to_usize().unwrap_or(BAR_WIDTH).clamp(1, BAR_WIDTH)
}

/// Renders one bar per bill, sized by the cost it was compared against.
///
/// With `ansi` set, covered bills are drawn green and uncovered bills red;
/// otherwise covered bars use `#` and uncovered bars use `x`.
pub fn render(
    results: &[CoverageResult],
    ansi: bool,
) -> String {
    let mut out = String::new();
    let max_cost = results
        .iter()
        .map(|r| r.compared_cost)
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_width = results
        .iter()
        .map(|r| display_name(r).chars().count())
        .max()
        .unwrap_or(0);

    for result in results {
        let len = bar_len(result.compared_cost, max_cost);
        let status = if result.is_covered {
            "covered"
        } else {
            "not covered"
        };
        let bar = match (ansi, result.is_covered) {
            (true, true) => format!("{GREEN}{}{RESET}", "█".repeat(len)),
            (true, false) => format!("{RED}{}{RESET}", "█".repeat(len)),
            (false, true) => "#".repeat(len),
            (false, false) => "x".repeat(len),
        };
        let padding = " ".repeat(BAR_WIDTH - len);
        let _ = writeln!(
            out,
            "{:<label_width$}  {bar}{padding}  {} ({status})",
            display_name(result),
            format_currency(nearest_f64(result.compared_cost)),
        );
    }
    out
}

/// Bills without a name are labelled by id.
pub fn display_name(result: &CoverageResult) -> String {
    if result.bill_name.trim().is_empty() {
        format!("Bill {}", result.bill_id)
    } else {
        result.bill_name.clone()
    }
}
