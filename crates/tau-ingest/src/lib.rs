//! Source table ingestion for NPX exports.
//!
//! This crate loads long-format exports (one row per sample–assay pair) into
//! Polars DataFrames and provides the cell conversions the rest of the
//! workspace builds on.
//!
//! # Features
//!
//! - **Table Loading**: Parquet, CSV and TSV, chosen by file extension
//! - **Cell Conversion**: Polars `AnyValue` to labels, floats and `FieldValue`
//! - **Row Access**: one row as a field-name → value record
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tau_ingest::{read_table, row_record};
//!
//! let df = read_table(Path::new("data/run1_npx.parquet"))?;
//! let first = row_record(&df, 0)?;
//! ```

mod error;
mod polars_utils;
mod reader;
mod rows;

// === Error Types ===
pub use error::{IngestError, Result};

// === Table Reading ===
pub use reader::{
    INFER_SCHEMA_ROWS, TableFormat, read_delimited_table, read_parquet_table, read_table,
    read_table_with_text_columns, validate_dataframe_shape,
};

// === Cell Conversion ===
pub use polars_utils::{
    any_to_f64, any_to_field_value, any_to_label, any_to_string, format_numeric,
    is_numeric_dtype, parse_f64,
};

// === Row Access ===
pub use rows::{column_field_values, column_labels, column_names, row_record};
