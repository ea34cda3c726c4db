pub mod csv_import;
pub mod fields;

pub use csv_import::{parse_portfolio, IngestOutcome};
