use offset_core::Bill;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when user input cannot be turned into a value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseInputError {
    #[error("invalid number '{0}'")]
    InvalidDecimal(String),

    #[error("{0} must not be negative")]
    Negative(Decimal),

    #[error("{0} is not a percentage between 0 and 100")]
    PercentOutOfRange(Decimal),

    #[error("bill must look like NAME:MONTHLY[:INFLATION], got '{0}'")]
    InvalidBillSpec(String),
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and an optional
/// leading `$`. Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseInputError> {
    let normalized = normalize_decimal_input(s);
    let normalized = normalized
        .strip_prefix('$')
        .unwrap_or(normalized.as_str())
        .trim_start();
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseInputError::InvalidDecimal(s.to_string())
    })
}

/// Parses a non-negative amount or rate.
pub fn parse_non_negative(s: &str) -> Result<Decimal, ParseInputError> {
    let value = parse_decimal(s)?;
    if value < Decimal::ZERO {
        return Err(ParseInputError::Negative(value));
    }
    Ok(value)
}

/// Parses a percentage in `[0, 100]`. A trailing `%` is accepted.
pub fn parse_percent(s: &str) -> Result<Decimal, ParseInputError> {
    let trimmed = s.trim();
    let value = parse_decimal(trimmed.strip_suffix('%').unwrap_or(trimmed))?;
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ParseInputError::PercentOutOfRange(value));
    }
    Ok(value)
}

/// Parses a bill given on the command line as `NAME:MONTHLY[:INFLATION]`.
///
/// The name may be empty; the inflation rate defaults to 0.
pub fn parse_bill_spec(s: &str) -> Result<Bill, ParseInputError> {
    let mut parts = s.split(':');
    let (Some(name), Some(monthly)) = (parts.next(), parts.next()) else {
        return Err(ParseInputError::InvalidBillSpec(s.to_string()));
    };
    let inflation = parts.next();
    if parts.next().is_some() {
        return Err(ParseInputError::InvalidBillSpec(s.to_string()));
    }

    Ok(Bill::new(
        name.trim(),
        parse_non_negative(monthly)?,
        inflation.map(parse_percent).transpose()?.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_dollar_sign() {
        assert_eq!(parse_decimal("$10,000").unwrap(), dec!(10000));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert_eq!(
            parse_decimal("abc"),
            Err(ParseInputError::InvalidDecimal("abc".to_string()))
        );
    }

    #[test]
    fn parse_non_negative_rejects_negative() {
        assert_eq!(
            parse_non_negative("-3"),
            Err(ParseInputError::Negative(dec!(-3)))
        );
    }

    #[test]
    fn parse_percent_accepts_bounds_and_suffix() {
        assert_eq!(parse_percent("0").unwrap(), dec!(0));
        assert_eq!(parse_percent("100").unwrap(), dec!(100));
        assert_eq!(parse_percent("3.5%").unwrap(), dec!(3.5));
    }

    #[test]
    fn parse_percent_rejects_out_of_range() {
        assert_eq!(
            parse_percent("100.1"),
            Err(ParseInputError::PercentOutOfRange(dec!(100.1)))
        );
        assert!(parse_percent("-1").is_err());
    }

    #[test]
    fn parse_bill_spec_with_inflation() {
        let bill = parse_bill_spec("Internet:35:2.5").unwrap();

        assert_eq!(bill, Bill::new("Internet", dec!(35), dec!(2.5)));
    }

    #[test]
    fn parse_bill_spec_defaults_inflation_to_zero() {
        let bill = parse_bill_spec("Water:1,200").unwrap();

        assert_eq!(bill, Bill::new("Water", dec!(1200), dec!(0)));
    }

    #[test]
    fn parse_bill_spec_allows_empty_name() {
        let bill = parse_bill_spec(":20").unwrap();

        assert_eq!(bill.name, "");
    }

    #[test]
    fn parse_bill_spec_rejects_malformed_input() {
        assert!(parse_bill_spec("Internet").is_err());
        assert!(parse_bill_spec("a:1:2:3").is_err());
        assert!(parse_bill_spec("a:-1").is_err());
    }
}
