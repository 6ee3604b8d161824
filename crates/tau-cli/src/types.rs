use std::path::PathBuf;

use tau_model::FormatLevel;
use tau_transform::ConversionConfig;
use tau_validate::TableValidationReport;

/// A `convert` invocation.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub config: ConversionConfig,
    /// Defaults to `<input stem>_container` next to the input.
    pub output_dir: Option<PathBuf>,
    /// Convert and report without writing files.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSummary {
    pub key: String,
    pub numeric: bool,
    pub filled: usize,
    pub missing: usize,
}

#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub input: PathBuf,
    pub input_rows: usize,
    pub primary: String,
    pub n_obs: usize,
    pub n_vars: usize,
    pub layers: Vec<LayerSummary>,
    pub uns_keys: Vec<String>,
    /// `None` on a dry run.
    pub output_dir: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// A `validate` invocation.
#[derive(Debug, Clone)]
pub struct ValidateRequest {
    pub input: PathBuf,
    pub level: FormatLevel,
    /// Validate only the first rows of the table.
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ValidateResult {
    pub input: PathBuf,
    pub total_rows: usize,
    pub report: TableValidationReport,
}

impl ValidateResult {
    pub fn has_errors(&self) -> bool {
        !self.report.is_valid()
    }
}
