pub mod header;
pub mod money;
pub mod movement;

pub use header::{HeaderSummary, HeaderValue};
pub use money::{format_brl, format_brl_opt, parse_brl, Brl};
pub use movement::{Movement, OTHER_DESTINATION};
