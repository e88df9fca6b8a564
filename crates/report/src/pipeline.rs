use serde::Serialize;
use thiserror::Error;

use caixa_classify::{assign_destinations, DestinationMap, RuleEngine, RuleSet};
use caixa_core::{HeaderSummary, Movement};
use caixa_parse::{extract_header, parse_movements};

use crate::detail::{detail_with_subtotals, DetailRow};
use crate::group::{sort_movements, GroupKey};
use crate::ledger::{is_opening_entry, ledger_rows, LedgerRow};
use crate::summary::{summarize_by_destination, DestinationSummary};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unrecognized cashier report: no header fields or movement table found")]
    Unrecognized,
}

/// Everything derived from one raw report: the header summary, the parsed
/// and classified movements, the subtotaled detail view, the ledger export
/// rows, and the per-destination roll-up.
#[derive(Debug, Serialize)]
pub struct Report {
    pub header: HeaderSummary,
    pub movements: Vec<Movement>,
    pub detail: Vec<DetailRow>,
    pub ledger: Vec<LedgerRow>,
    pub summary: Vec<DestinationSummary>,
}

impl Report {
    /// Run the whole pipeline over the raw report text.
    ///
    /// Fails only when the text yields neither header fields nor movements;
    /// individual malformed lines are skipped upstream.
    pub fn generate(
        raw: &str,
        rules: &RuleSet,
        map: &DestinationMap,
        group_keys: &[GroupKey],
        concat_code: bool,
    ) -> Result<Report, ReportError> {
        let header = extract_header(raw);
        let mut movements = parse_movements(raw, concat_code);
        if header.is_empty() && movements.is_empty() {
            return Err(ReportError::Unrecognized);
        }
        tracing::debug!(
            header_fields = header.len(),
            movements = movements.len(),
            "parsed cashier report"
        );

        RuleEngine::new(rules).apply(&mut movements);
        assign_destinations(&mut movements, map);
        sort_movements(&mut movements, group_keys);

        let detail = detail_with_subtotals(&movements, group_keys);
        let ledger = ledger_rows(&movements);
        let posted: Vec<Movement> = movements
            .iter()
            .filter(|m| !is_opening_entry(m))
            .cloned()
            .collect();
        let summary = summarize_by_destination(&posted);

        Ok(Report {
            header,
            movements,
            detail,
            ledger,
            summary,
        })
    }
}
