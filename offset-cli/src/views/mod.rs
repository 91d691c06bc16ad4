//! Text and JSON rendering of calculator output.

pub mod chart;
pub mod perpetuity;
pub mod projection;

use clap::ValueEnum;
use serde::Serialize;

/// How one-shot commands print their results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Pretty-printed JSON followed by a newline.
pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use offset_core::calculations::{PerpetuityCalculator, PerpetuityInput};

    #[test]
    fn json_serializes_decimals_as_strings() {
        let input = PerpetuityInput {
            monthly_bill: dec!(100),
            annual_return_percent: dec!(5),
            inflation_rate_percent: dec!(0),
            tax_rate_percent: dec!(0),
        };
        let result = PerpetuityCalculator::new().calculate(&input).unwrap();

        let json: serde_json::Value = serde_json::from_str(&render_json(&result).unwrap()).unwrap();

        let field = |name: &str| json[name].as_str().unwrap().parse::<rust_decimal::Decimal>().unwrap();
        assert_eq!(field("annual_bill"), dec!(1200));
        assert_eq!(field("required_after_tax"), dec!(24000));
    }
}
