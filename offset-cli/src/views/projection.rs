use std::fmt::Write;

use offset_core::CoverageReport;
use offset_core::calculations::common::nearest_f64;
use offset_core::calculations::{CoveragePolicy, ProjectionError, ProjectionResult};

use crate::format::{format_currency, format_percent};
use crate::views::chart;

pub const FULLY_COVERED: &str = "Fully covered: the projected value pays for every bill.";
pub const NOT_FULLY_COVERED: &str = "Not fully covered";

/// Renders the projection, the bill chart, the coverage table and the banner.
pub fn render(
    outcome: &Result<ProjectionResult, ProjectionError>,
    ansi: bool,
) -> String {
    let result = match outcome {
        Ok(result) => result,
        Err(err) => return format!("{err}\n"),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Effective ROI: {}",
        format_percent(nearest_f64(result.effective_roi))
    );
    let _ = writeln!(
        out,
        "Projected value after {} {}: {}",
        result.years,
        if result.years == 1 { "year" } else { "years" },
        format_currency(nearest_f64(result.future_value))
    );

    if result.coverage.results.is_empty() {
        let _ = writeln!(out, "\nNo bills added.");
    } else {
        let heading = match result.policy {
            CoveragePolicy::Nominal => "Annual bill costs",
            CoveragePolicy::InflationAdjusted => "Annual bill costs (inflated to end of projection)",
        };
        let _ = writeln!(out, "\n{heading}");
        out.push_str(&chart::render(&result.coverage.results, ansi));
        out.push('\n');
        out.push_str(&render_table(&result.coverage));
    }

    let _ = writeln!(out, "\n{}", banner(&result.coverage));
    out
}

/// Tabular summary of `{id, name, annual cost, covered}` with a total row.
pub fn render_table(report: &CoverageReport) -> String {
    let rows: Vec<[String; 4]> = report
        .results
        .iter()
        .map(|r| {
            [
                r.bill_id.to_string(),
                r.bill_name.clone(),
                format_currency(nearest_f64(r.annual_cost)),
                if r.is_covered { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();

    let header = ["ID", "Name", "Annual Cost", "Covered"];
    let total = format_currency(nearest_f64(report.total_annual_cost()));
    let mut widths = header.map(str::len);
    widths[2] = widths[2].max(total.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w0$}  {:<w1$}  {:>w2$}  {}",
        header[0],
        header[1],
        header[2],
        header[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    for [id, name, cost, covered] in rows {
        let _ = writeln!(
            out,
            "{id:<w0$}  {name:<w1$}  {cost:>w2$}  {covered}",
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
    }
    let _ = writeln!(
        out,
        "{:<w0$}  {:<w1$}  {total:>w2$}",
        "",
        "Total",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    out
}

/// One-line summary of whether every bill is covered.
pub fn banner(report: &CoverageReport) -> String {
    if report.all_covered {
        FULLY_COVERED.to_string()
    } else {
        format!(
            "{NOT_FULLY_COVERED}: {} of {} bills covered.",
            report.covered_count(),
            report.results.len()
        )
    }
}
