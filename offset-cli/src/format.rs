//! Display formatting for amounts and rates.
//!
//! Values are printed from `f64` with `{:.2}`: the binary value is rounded
//! to the nearest cent, ties to even.

/// Formats an amount as dollars with two decimals and thousands separators.
///
/// ```
/// use offset_cli::format::format_currency;
///
/// assert_eq!(format_currency(29664.0), "$29,664.00");
/// assert_eq!(format_currency(25937.424601), "$25,937.42");
/// ```
pub fn format_currency(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let shows_nonzero = text.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if value.is_sign_negative() && shows_nonzero {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&text))
}

/// Formats a percentage with two decimals.
///
/// ```
/// use offset_cli::format::format_percent;
///
/// assert_eq!(format_percent(8.0), "8.00%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Formats an entered rate the way a float prints: `20.0%`, `2.5%`.
pub fn format_rate_input(value: f64) -> String {
    format!("{value:?}%")
}

fn group_thousands(text: &str) -> String {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn currency_pads_to_two_decimals() {
        assert_eq!(format_currency(1200.0), "$1,200.00");
        assert_eq!(format_currency(247.20000000000002), "$247.20");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(999.0), "$999.00");
        assert_eq!(format_currency(1000.0), "$1,000.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn currency_rounds_the_binary_value() {
        // 1903.125 is exact in binary and ties to even
        assert_eq!(format_currency(1903.125), "$1,903.12");
        // 0.125 likewise; 0.375 rounds up to the even cent
        assert_eq!(format_currency(0.125), "$0.12");
        assert_eq!(format_currency(0.375), "$0.38");
        // 1200.0749999999998 sits below the half cent
        assert_eq!(format_currency(100.00625 * 12.0), "$1,200.07");
    }

    #[test]
    fn currency_handles_zero_and_negative() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(-1500.5), "-$1,500.50");
    }

    #[test]
    fn percent_uses_two_decimals() {
        assert_eq!(format_percent(8.0), "8.00%");
        assert_eq!(format_percent(7.126), "7.13%");
    }

    #[test]
    fn rate_input_prints_like_a_float() {
        assert_eq!(format_rate_input(20.0), "20.0%");
        assert_eq!(format_rate_input(2.5), "2.5%");
        assert_eq!(format_rate_input(0.0), "0.0%");
    }
}
