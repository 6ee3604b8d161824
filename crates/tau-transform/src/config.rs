//! Configuration for a long-to-wide conversion.

use serde::{Deserialize, Serialize};

/// Per-assay columns stored in `var` by default.
///
/// `Block` and `AssayQC` are listed twice; repeats collapse during
/// classification.
pub const DEFAULT_VARIABLE_COLUMNS: &[&str] = &[
    "Assay",
    "UniProt",
    "OlinkID",
    "Panel",
    "AssayType",
    "Block",
    "AssayQC",
    "high_var_assay",
    "assay_level_qc",
    "Block",
    "AssayQC",
    "IntraCV",
    "InterCV",
    "AssayQCWarn",
];

/// Per-sample columns stored in `obs` by default.
pub const DEFAULT_OBSERVATION_COLUMNS: &[&str] = &[
    "SubjectRef",
    "Assay_Sample_ID",
    "SampleID",
    "SampleType",
    "SampleQC",
    "InstrumentType",
    "Project",
    "KitLot",
    "PCLot",
    "SCLot",
    "NCLot",
    "AssayTechIssue",
    "UniqueID",
    "Median",
    "Variance",
    "ReferenceMedian",
];

/// Run-level columns stored in `uns` by default.
pub const DEFAULT_DATASET_COLUMNS: &[&str] = &[
    "Assay_Filename",
    "Analyte_Failure_Pct",
    "Analyte_Warn_Pct",
    "Plating_Notes",
    "PlateID",
    "DataAnalysisRefID",
    "Panel",
    "Normalization",
    "SoftwareVersion",
    "SoftwareName",
    "PanelDataArchiveVersion",
    "PreProcessingVersion",
];

/// Sample-by-assay columns pivoted into layers by default.
pub const DEFAULT_LAYER_COLUMNS: &[&str] = &[
    "WellID",
    "ExtNPX",
    "NPX",
    "ExtNPX_Corrected",
    "LogProtExp",
    "LogProtExp_Raw",
    "Correction",
    "PCNormalizedNPX",
    "SampleBlockQCWarn",
    "SampleBlockQCFail",
    "BlockQCFail",
    "sample_level_qc",
];

/// Assay identifier column used when none is configured.
pub const DEFAULT_ASSAY_IDENTIFIER: &str = "Assay";

/// How the pivot treats a (sample, assay) pair that occurs more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the conversion.
    #[default]
    Reject,
    /// Keep the value from the first row in table order.
    KeepFirst,
    /// Keep the value from the last row in table order.
    KeepLast,
}

/// Options controlling a conversion.
///
/// Extra columns are appended to the matching default list; names absent
/// from the table are dropped during classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Layer promoted to the primary matrix `X`.
    pub matrix_selector_column: String,
    /// Column whose values index `obs` and the layer rows.
    pub sample_identifier_column: String,
    /// Column whose values index `var` and the layer columns.
    pub assay_identifier_column: String,
    pub extra_observation_columns: Vec<String>,
    pub extra_variable_columns: Vec<String>,
    pub extra_dataset_columns: Vec<String>,
    pub extra_layer_columns: Vec<String>,
    pub duplicate_policy: DuplicatePolicy,
}

impl ConversionConfig {
    pub fn new(
        matrix_selector_column: impl Into<String>,
        sample_identifier_column: impl Into<String>,
    ) -> Self {
        Self {
            matrix_selector_column: matrix_selector_column.into(),
            sample_identifier_column: sample_identifier_column.into(),
            assay_identifier_column: DEFAULT_ASSAY_IDENTIFIER.to_string(),
            extra_observation_columns: Vec::new(),
            extra_variable_columns: Vec::new(),
            extra_dataset_columns: Vec::new(),
            extra_layer_columns: Vec::new(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_assay_identifier(mut self, column: impl Into<String>) -> Self {
        self.assay_identifier_column = column.into();
        self
    }

    pub fn with_extra_observation_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_observation_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_variable_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_variable_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_dataset_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_dataset_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_layer_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_layer_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_default_list_sizes() {
        assert_eq!(DEFAULT_VARIABLE_COLUMNS.len(), 14);
        let distinct: BTreeSet<_> = DEFAULT_VARIABLE_COLUMNS.iter().collect();
        assert_eq!(distinct.len(), 12);
        assert_eq!(DEFAULT_OBSERVATION_COLUMNS.len(), 16);
        assert_eq!(DEFAULT_DATASET_COLUMNS.len(), 12);
        assert_eq!(DEFAULT_LAYER_COLUMNS.len(), 12);
    }

    #[test]
    fn test_builder() {
        let config = ConversionConfig::new("NPX", "SampleID")
            .with_extra_layer_columns(["Count"])
            .with_extra_dataset_columns(vec!["RunDate".to_string()])
            .with_duplicate_policy(DuplicatePolicy::KeepLast);
        assert_eq!(config.assay_identifier_column, "Assay");
        assert_eq!(config.extra_layer_columns, vec!["Count"]);
        assert_eq!(config.extra_dataset_columns, vec!["RunDate"]);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::KeepLast);
    }
}
