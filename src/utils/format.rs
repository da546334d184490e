//! Console formatting for balances and addresses.

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// Render a decimal balance string with thousands separators at `scale`
/// fractional digits.
///
/// Parsing goes through BigDecimal, so large 18-decimal balances keep every
/// integer digit. Unparsable input renders as `0`.
///
/// # Example
/// ```ignore
/// assert_eq!(format_balance("1234567.891", 2), "1,234,567.89");
/// ```
pub fn format_balance(balance: &str, scale: i64) -> String {
    let value = match BigDecimal::from_str(balance.trim()) {
        Ok(v) => v,
        Err(_) => BigDecimal::from(0),
    };

    let rounded = value
        .with_scale_round(scale.max(0), RoundingMode::HalfEven)
        .to_plain_string();

    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut out = String::with_capacity(rounded.len() + integer.len() / 3);
    out.push_str(sign);
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Truncate an address for display, marking the cut with `...`.
pub fn short_address(address: &str, len: usize) -> String {
    if address.chars().count() <= len {
        return address.to_string();
    }

    let head: String = address.chars().take(len).collect();
    format!("{}...", head)
}
