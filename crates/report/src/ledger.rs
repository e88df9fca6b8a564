use rust_decimal::Decimal;
use serde::Serialize;

use caixa_core::Movement;

/// Cashier-opening rows are bookkeeping noise and never reach the ledger.
const OPENING_MARKER: &str = "abertura automática";

pub(crate) fn is_opening_entry(movement: &Movement) -> bool {
    movement.description.to_lowercase().contains(OPENING_MARKER)
}

/// One ledger export row. `date` is the posting day without the time part.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    pub description: String,
    pub account_code: Option<String>,
    pub availability: Option<String>,
    pub date: String,
    pub amount: Option<Decimal>,
    pub destination: String,
}

pub fn ledger_rows(movements: &[Movement]) -> Vec<LedgerRow> {
    movements
        .iter()
        .filter(|m| !is_opening_entry(m))
        .map(|m| LedgerRow {
            description: m.description.clone(),
            account_code: m.account_code.clone(),
            availability: m.availability.clone(),
            date: m.posted_date().to_string(),
            amount: m.amount,
            destination: m.destination.clone(),
        })
        .collect()
}
