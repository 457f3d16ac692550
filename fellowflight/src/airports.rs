//! Airport reference data and fuzzy lookup

pub mod index;
pub mod record;
mod score;

use thiserror::Error;

pub use index::{AirportIndex, BuildReport, DEFAULT_THRESHOLD, REQUIRED_COLUMNS};
pub use record::AirportRecord;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed airport row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
    #[error("Airport table lacks the `{0}` column")]
    MissingColumn(&'static str),
    #[error("Cannot read airport table: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse airport table: {0}")]
    Csv(#[from] csv::Error),
}
