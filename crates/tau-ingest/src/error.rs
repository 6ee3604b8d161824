//! Error types for source table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a source table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension is not one of the supported table formats.
    #[error("unsupported table format for {path} (expected .parquet, .csv or .tsv)")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// Polars failed to parse the Parquet file.
    #[error("failed to parse Parquet {path}: {message}")]
    ParquetParse { path: PathBuf, message: String },

    /// Polars failed to parse the delimited text file.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Table has no rows.
    #[error("table is empty: {path}")]
    EmptyTable { path: PathBuf },

    /// Table has a blank column name.
    #[error("table has an empty column name: {path}")]
    EmptyColumnName { path: PathBuf },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/run1.parquet"),
        };
        assert_eq!(err.to_string(), "source file not found: /data/run1.parquet");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("NPX".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
