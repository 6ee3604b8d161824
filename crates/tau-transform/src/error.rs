//! Error types for conversions.

use std::fmt;

use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;

/// Which axis of a layer disagrees with its descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerAxis {
    /// Rows, checked against the `obs` index.
    Obs,
    /// Columns, checked against the `var` index.
    Var,
}

impl fmt::Display for LayerAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerAxis::Obs => f.write_str("obs"),
            LayerAxis::Var => f.write_str("var"),
        }
    }
}

/// Errors that abort a conversion. No container is produced.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required column is absent from the table or from the produced layers.
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// A layer's labels are not the same set as its descriptor's index.
    #[error(
        "layer '{layer}' {axis} labels do not match the {axis} index (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    AxisMismatch {
        layer: String,
        axis: LayerAxis,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// The same (sample, assay) pair occurs more than once.
    #[error("layer '{layer}' has more than one value for sample '{sample}', assay '{assay}'")]
    DuplicateEntry {
        layer: String,
        sample: String,
        assay: String,
    },

    /// An identifier cell is null.
    #[error("identifier column '{column}' is null at row {row}")]
    NullIdentifier { column: String, row: usize },

    /// The primary matrix was requested from a text layer.
    #[error("layer '{layer}' is not numeric and cannot be the primary matrix")]
    NonNumericLayer { layer: String },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl ConvertError {
    pub(crate) fn missing(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
