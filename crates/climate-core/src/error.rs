use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the climate report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV header or row could not be parsed.
    #[error("Failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The indicator spreadsheet could not be opened or read.
    #[error("Failed to read spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// A month value outside the twelve recognised abbreviations.
    #[error("Unknown month abbreviation: {0:?}")]
    UnknownMonth(String),

    /// An expected column is missing from a source table.
    #[error("Missing column {column:?} in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A cell value could not be parsed as the expected type.
    #[error("Invalid {column} value {value:?} in {path}")]
    InvalidCell {
        path: PathBuf,
        column: String,
        value: String,
    },

    /// One of the four per-variable regional tables disagrees on row count.
    #[error("Regional table {table} has {actual} rows, expected {expected}")]
    RegionalShapeMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// A (province, year, month) key present in the mean-temp table is
    /// absent from another per-variable table.
    #[error("Regional table {table} has no row for {province} {year} {month}")]
    RegionalKeyMismatch {
        table: String,
        province: String,
        year: i32,
        month: String,
    },

    /// The dataset root does not exist or lacks the expected layout.
    #[error("Dataset root not found: {0}")]
    DataRootNotFound(PathBuf),

    /// A comparison label outside the nine recognised options.
    #[error("Unknown comparison: {0:?}")]
    UnknownComparison(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
