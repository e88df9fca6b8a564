pub mod detail;
pub mod group;
pub mod ledger;
pub mod pipeline;
pub mod summary;

pub use detail::{detail_with_subtotals, DetailRow, RowKind};
pub use group::{sort_movements, GroupKey};
pub use ledger::{ledger_rows, LedgerRow};
pub use pipeline::{Report, ReportError};
pub use summary::{summarize_by_destination, DestinationSummary};
