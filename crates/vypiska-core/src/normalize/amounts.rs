//! Amount normalization for statement tokens.

use rust_decimal::Decimal;
use std::str::FromStr;

const UNICODE_MINUS: char = '\u{2212}';

/// Parse a locale-formatted amount (e.g. "-2 880,00 ₸" or "1,234.56").
///
/// Never fails: input with no numeric content yields zero.
pub fn parse_amount(text: &str) -> Decimal {
    parse_amount_checked(text).unwrap_or(Decimal::ZERO)
}

/// Parse a locale-formatted amount, returning `None` when the token is not numeric.
///
/// When both a comma and a period are present, the comma is a thousands
/// separator; a lone comma is the decimal point.
pub fn parse_amount_checked(text: &str) -> Option<Decimal> {
    let unified: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == UNICODE_MINUS { '-' } else { c })
        .collect();

    let separated = if unified.contains(',') && unified.contains('.') {
        unified.replace(',', "")
    } else {
        unified.replace(',', ".")
    };

    let cleaned: String = separated
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let unsigned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(unsigned.trim_end_matches('.')).ok()
}
