use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Destination-account label for payment methods no map rule claims.
pub const OTHER_DESTINATION: &str = "OUTROS";

/// One monetary transaction line from the cashier report.
///
/// `description_base` is the text exactly as it appeared in the source table
/// and is the only field classification rules match against; `description` is
/// the display form (optionally code-prefixed), derived once at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    pub code: Option<i64>,
    pub description_base: String,
    pub description: String,
    pub kind: String,
    pub amount_text: String,
    pub amount: Option<Decimal>,
    pub payment_method: String,
    pub installments: Option<i64>,
    pub posted_at: String,
    pub account_code: Option<String>,
    pub availability: Option<String>,
    pub destination: String,
}

impl Movement {
    /// Date component of `posted_at` (the text before the first space).
    pub fn posted_date(&self) -> &str {
        self.posted_at.split_whitespace().next().unwrap_or("")
    }
}
