//! Long-to-wide reshaping of NPX exports.
//!
//! A long-format table (one row per sample–assay pair) becomes an
//! [`AnnotatedContainer`]: a primary matrix `X`, per-sample `obs`, per-assay
//! `var`, run-level `uns` and one sample-by-assay layer per measurement
//! column.
//!
//! # Example
//!
//! ```ignore
//! use tau_transform::{ConversionConfig, convert};
//!
//! let config = ConversionConfig::new("NPX", "SampleID").with_extra_layer_columns(["Count"]);
//! let container = convert(&df, &config)?;
//! assert_eq!(container.x().dim(), container.shape());
//! ```
//!
//! Conversion steps:
//! - [`classify_columns`] routes present columns to the four destinations
//! - [`pivot_layer`] turns one column into a sample-by-assay matrix
//! - [`AnnotatedContainer::new`] checks every layer against `obs` and `var`

mod classify;
mod config;
mod container;
mod convert;
mod error;
mod pivot;

pub use classify::{ColumnPlan, classify_columns};
pub use config::{
    ConversionConfig, DEFAULT_ASSAY_IDENTIFIER, DEFAULT_DATASET_COLUMNS, DEFAULT_LAYER_COLUMNS,
    DEFAULT_OBSERVATION_COLUMNS, DEFAULT_VARIABLE_COLUMNS, DuplicatePolicy,
};
pub use container::{AnnotatedContainer, DatasetMetadata, Descriptor};
pub use convert::convert;
pub use error::{ConvertError, LayerAxis, Result};
pub use pivot::{LayerMatrix, LayerValues, pivot_layer};
