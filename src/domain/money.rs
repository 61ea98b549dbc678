use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Money is an exact decimal amount. It is never rounded internally; only the
/// display helpers below cut it down to two decimals.
pub type Money = Decimal;

pub const CURRENCY_SYMBOL: &str = "€";

/// Format an amount with exactly two decimals.
/// Example: 50 -> "50.00", -12.345 -> "-12.35"
pub fn format_amount(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Format an amount the way the balance and tables show it.
/// Example: 850 -> "€850.00", -150 -> "€-150.00"
pub fn format_currency(amount: Money) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(amount))
}

/// Parse user input into an amount.
/// Accepts plain decimals ("50", "12.5", "-3") and scientific notation ("1e3").
pub fn parse_amount(input: &str) -> Result<Money, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is missing"),
            ParseAmountError::InvalidFormat(input) => {
                write!(f, "could not convert '{}' to a number", input)
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(d("50")), "50.00");
        assert_eq!(format_amount(d("12.34")), "12.34");
        assert_eq!(format_amount(d("12.5")), "12.50");
        assert_eq!(format_amount(d("0.01")), "0.01");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
        assert_eq!(format_amount(d("-50")), "-50.00");
        assert_eq!(format_amount(d("-12.345")), "-12.35");
        assert_eq!(format_amount(d("-0.001")), "0.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(d("850")), "€850.00");
        assert_eq!(format_currency(d("-150")), "€-150.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.00"), Ok(d("50.00")));
        assert_eq!(parse_amount("50"), Ok(d("50")));
        assert_eq!(parse_amount(" 12.5 "), Ok(d("12.5")));
        assert_eq!(parse_amount("-3"), Ok(d("-3")));
        assert_eq!(parse_amount("100.999"), Ok(d("100.999")));
        assert_eq!(parse_amount("1e3"), Ok(d("1000")));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount(""), Err(ParseAmountError::Empty));
        assert_eq!(parse_amount("   "), Err(ParseAmountError::Empty));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.34.56").is_err());
    }
}
