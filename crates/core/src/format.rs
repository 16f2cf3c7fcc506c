use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders an amount with exactly two decimal places and `,` thousands
/// separators. Rounding happens here and nowhere in the pricing path.
pub fn format_amount(value: f64) -> String {
    let Some(mut decimal) = Decimal::from_f64(value) else {
        return format!("{value:.2}");
    };
    decimal = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    decimal.rescale(2);

    let rendered = decimal.abs().to_string();
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let sign = if decimal.is_sign_negative() && !decimal.is_zero() { "-" } else { "" };

    format!("{sign}{}.{fraction}", group_thousands(integer))
}

pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{symbol} {}", format_amount(value))
}

/// Percentages keep their natural precision: `30`, `7.5`.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value}%")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{format_amount, format_currency, format_percent};

    #[test]
    fn amounts_always_have_two_decimals() {
        assert_eq!(format_amount(2000.0), "2,000.00");
        assert_eq!(format_amount(0.5), "0.50");
        assert_eq!(format_amount(80_000.0), "80,000.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(-0.125), "-0.13");
    }

    #[test]
    fn negative_totals_keep_their_sign() {
        assert_eq!(format_currency("R$", -50.0), "R$ -50.00");
    }

    #[test]
    fn percentages_drop_trailing_zero_fraction() {
        assert_eq!(format_percent(30.0), "30%");
        assert_eq!(format_percent(7.5), "7.5%");
    }
}
