use rust_decimal::Decimal;
use serde::Serialize;

use caixa_core::Movement;

/// Per-destination roll-up of the posted movements.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationSummary {
    pub destination: String,
    pub count: usize,
    pub total: Decimal,
}

/// Count and sum movements per destination account, sorted by destination
/// name ascending. Movements without a parsed amount still count but add
/// nothing to the total.
pub fn summarize_by_destination(movements: &[Movement]) -> Vec<DestinationSummary> {
    let mut summaries: Vec<DestinationSummary> = Vec::new();
    for movement in movements {
        match summaries
            .iter_mut()
            .find(|s| s.destination == movement.destination)
        {
            Some(summary) => {
                summary.count += 1;
                summary.total += movement.amount.unwrap_or(Decimal::ZERO);
            }
            None => summaries.push(DestinationSummary {
                destination: movement.destination.clone(),
                count: 1,
                total: movement.amount.unwrap_or(Decimal::ZERO),
            }),
        }
    }
    summaries.sort_by(|a, b| a.destination.cmp(&b.destination));
    summaries
}
