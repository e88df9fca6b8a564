use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency symbol of the source locale (pt-BR).
pub const CURRENCY_SYMBOL: &str = "R$";

/// Display wrapper rendering a value in the report's own convention
/// (`R$ 1.234,56`). The raw `Decimal` stays available for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Brl(pub Decimal);

impl fmt::Display for Brl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_brl(self.0))
    }
}

/// Parse a locale-formatted monetary string (`R$ 1.234,56`, NBSP-tolerant)
/// into a `Decimal`. Returns `None` for anything unparseable; never panics.
pub fn parse_brl(text: &str) -> Option<Decimal> {
    let cleaned = text
        .replace('\u{a0}', "")
        .trim()
        .replace(CURRENCY_SYMBOL, "")
        .replace(' ', "")
        .replace('.', "")
        .replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Render with two decimals, `,` as decimal separator and `.` as thousands
/// separator, prefixed with the currency symbol and a space.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let abs = rounded.abs();
    let text = abs.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), format!("{f:0<2}")),
        None => (text, "00".to_string()),
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{CURRENCY_SYMBOL} {sign}{},{frac_part}",
        group_thousands(&int_part)
    )
}

/// Empty string for an absent value.
pub fn format_brl_opt(value: Option<Decimal>) -> String {
    value.map(format_brl).unwrap_or_default()
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(*b as char);
    }
    out
}
