pub mod header;
pub mod table;

pub use header::extract_header;
pub use table::parse_movements;
