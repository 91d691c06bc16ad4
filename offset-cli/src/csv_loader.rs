//! CSV loader for recurring bills.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column           | Required | Type    | Notes                                   |
//! |------------------|----------|---------|-----------------------------------------|
//! | `name`           | yes      | string  | May be empty                            |
//! | `monthly_cost`   | yes      | decimal | e.g. `35.00`; must not be negative      |
//! | `inflation_rate` | no       | decimal | Percent in `[0, 100]`; empty means `0`  |
//!
//! ### Example
//!
//! ```csv
//! name,monthly_cost,inflation_rate
//! Internet,35.00,2
//! Electricity,120.50,
//! ```
use std::fs;
use std::path::Path;

use offset_core::{Bill, BillError};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    monthly_cost: Decimal,
    inflation_rate: Option<Decimal>,
}

/// Errors that can occur while loading bills from CSV.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV is structurally invalid or a value has the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but holds a value outside the allowed range.
    /// `row` is 1-based, counting the first data row as 1.
    #[error("invalid bill on row {row}: {source}")]
    InvalidBill {
        row: usize,
        #[source]
        source: BillError,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Bill, CsvLoadError> {
    let bill = Bill::new(
        row.name,
        row.monthly_cost,
        row.inflation_rate.unwrap_or_default(),
    );
    bill.validate().map_err(|source| CsvLoadError::InvalidBill {
        row: row_number,
        source,
    })?;
    Ok(bill)
}

/// Parses CSV text and returns the bills in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is malformed or a required column is missing.
/// * [`CsvLoadError::InvalidBill`] if a row holds a negative cost or an
///   out-of-range inflation rate.
pub fn load_from_str(input: &str) -> Result<Vec<Bill>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let bills = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(count = bills.len(), "bills parsed from CSV");
    Ok(bills)
}

/// Reads the file at `path` and parses it with [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<Bill>, CsvLoadError> {
    let text = fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn loads_rows_in_order() {
        let csv = "name,monthly_cost,inflation_rate\nInternet,35.00,2\nWater,20,0\n";

        let bills = load_from_str(csv).unwrap();

        assert_eq!(
            bills,
            vec![
                Bill::new("Internet", dec!(35.00), dec!(2)),
                Bill::new("Water", dec!(20), dec!(0)),
            ]
        );
    }

    #[test]
    fn empty_inflation_defaults_to_zero() {
        let csv = "name,monthly_cost,inflation_rate\nGas,60,\n";

        let bills = load_from_str(csv).unwrap();

        assert_eq!(bills[0].inflation_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn inflation_column_is_optional() {
        let csv = "monthly_cost,name\n15.5,Phone\n";

        let bills = load_from_str(csv).unwrap();

        assert_eq!(bills, vec![Bill::new("Phone", dec!(15.5), dec!(0))]);
    }

    #[test]
    fn trims_whitespace() {
        let csv = "name , monthly_cost , inflation_rate\n  Rent , 1500 , 3 \n";

        let bills = load_from_str(csv).unwrap();

        assert_eq!(bills, vec![Bill::new("Rent", dec!(1500), dec!(3))]);
    }

    #[test]
    fn header_only_yields_no_bills() {
        let bills = load_from_str("name,monthly_cost,inflation_rate\n").unwrap();

        assert!(bills.is_empty());
    }

    #[test]
    fn missing_required_column_is_parse_error() {
        let result = load_from_str("name\nInternet\n");

        assert!(matches!(result, Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn non_numeric_cost_is_parse_error() {
        let result = load_from_str("name,monthly_cost\nInternet,lots\n");

        assert!(matches!(result, Err(CsvLoadError::Parse(_))));
    }

    #[test]
    fn negative_cost_reports_row() {
        let csv = "name,monthly_cost\nInternet,35\nRefund,-10\n";

        let err = load_from_str(csv).unwrap_err();

        assert!(matches!(
            err,
            CsvLoadError::InvalidBill {
                row: 2,
                source: BillError::NegativeMonthlyCost(_)
            }
        ));
    }

    #[test]
    fn inflation_above_one_hundred_is_rejected() {
        let csv = "name,monthly_cost,inflation_rate\nInternet,35,150\n";

        assert!(matches!(
            load_from_str(csv),
            Err(CsvLoadError::InvalidBill { row: 1, .. })
        ));
    }
}
