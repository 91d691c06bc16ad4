//! Formula vocabulary shared by the calculators.
//!
//! Both calculators speak in percentages and monthly amounts; the helpers
//! here convert those into yearly amounts and fractional rates, and hand
//! values over to `f64` for display.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Number of billing periods in a year.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Divisor turning a percentage into a fraction.
pub const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// The `f64` nearest to `value`.
///
/// Goes through the decimal text, which `f64` parsing rounds correctly;
/// [`ToPrimitive::to_f64`] can be off by one ulp for fractional values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use offset_core::calculations::common::nearest_f64;
///
/// assert_eq!(nearest_f64(dec!(100.00625)), 100.00625);
/// assert_eq!(nearest_f64(dec!(-0.1)), -0.1);
/// ```
pub fn nearest_f64(value: Decimal) -> f64 {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| value.to_f64().unwrap_or(f64::NAN))
}

/// Converts a monthly amount into a yearly one.
///
/// Saturates at [`Decimal::MAX`] rather than overflowing.
///
/// ```
/// use rust_decimal_macros::dec;
/// use offset_core::calculations::common::annualize;
///
/// assert_eq!(annualize(dec!(100)), dec!(1200));
/// ```
pub fn annualize(monthly: Decimal) -> Decimal {
    monthly.saturating_mul(MONTHS_PER_YEAR)
}

/// Converts a percentage (e.g. `5` for 5%) into a fraction (`0.05`).
pub fn percent_to_rate(percent: Decimal) -> Decimal {
    percent / ONE_HUNDRED
}

/// Returns `1 + percent / 100`, the factor applied for one year of growth.
pub fn growth_factor(percent: Decimal) -> Option<Decimal> {
    Decimal::ONE.checked_add(percent_to_rate(percent))
}

/// Raises `base` to a non-negative integer power by repeated squaring.
///
/// Returns `None` if any intermediate product overflows. `exp == 0` yields
/// exactly one regardless of `base`.
pub fn checked_powu(
    base: Decimal,
    exp: u32,
) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exp;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.checked_mul(square)?;
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // nearest_f64 tests
    // =========================================================================

    #[test]
    fn nearest_f64_matches_parsing_the_literal() {
        for (value, expected) in [
            (dec!(1200.075), 1200.075),
            (dec!(0.015), 0.015),
            (dec!(25937.424601), 25937.424601),
            (dec!(0), 0.0),
        ] {
            assert_eq!(nearest_f64(value), expected);
        }
    }

    // =========================================================================
    // rate helpers
    // =========================================================================

    #[test]
    fn months_per_year_is_twelve() {
        assert_eq!(MONTHS_PER_YEAR, dec!(12));
    }

    #[test]
    fn annualize_multiplies_by_twelve() {
        assert_eq!(annualize(dec!(35)), dec!(420));
        assert_eq!(annualize(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn annualize_saturates_instead_of_overflowing() {
        assert_eq!(annualize(Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn percent_to_rate_divides_by_one_hundred() {
        assert_eq!(percent_to_rate(dec!(5)), dec!(0.05));
        assert_eq!(percent_to_rate(dec!(20)), dec!(0.2));
    }

    #[test]
    fn growth_factor_adds_one() {
        assert_eq!(growth_factor(dec!(3)), Some(dec!(1.03)));
        assert_eq!(growth_factor(Decimal::ZERO), Some(Decimal::ONE));
    }

    // =========================================================================
    // checked_powu tests
    // =========================================================================

    #[test]
    fn checked_powu_zero_exponent_is_one() {
        assert_eq!(checked_powu(dec!(1.1), 0), Some(Decimal::ONE));
    }

    #[test]
    fn checked_powu_matches_repeated_multiplication() {
        assert_eq!(checked_powu(dec!(1.1), 10), Some(dec!(2.5937424601)));
        assert_eq!(checked_powu(dec!(2), 7), Some(dec!(128)));
    }

    #[test]
    fn checked_powu_reports_overflow() {
        assert_eq!(checked_powu(dec!(10), 40), None);
    }
}
