use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column `{column}` is missing from the {table} table")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("Invalid value {value:?} for `{column}` in the {table} table at line {line}: {reason}")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        line: u64,
        value: String,
        reason: String,
    },

    #[error("Invalid date range: {0}")]
    InvalidRange(#[from] core_types::CoreError),

    #[error("Date range {start}..={end} lies outside the data, which covers {min}..={max}")]
    RangeOutOfBounds {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        min: chrono::NaiveDate,
        max: chrono::NaiveDate,
    },

    #[error("The all-orders table is empty, so there is no date range to select from.")]
    Empty,
}
