//! Error types for data source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a data source.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV file has no header row.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// The load was cancelled before it finished.
    #[error("load of {path} was cancelled")]
    Cancelled { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, IngestError>;
