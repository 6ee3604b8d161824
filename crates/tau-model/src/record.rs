//! Typed NPX records at the two format levels.
//!
//! These are the output of schema validation: every field is present and
//! already converted to its domain type. Serde names match the export column
//! names so a record serializes back to the flat row it came from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{
    AssayLevelQc, HighVarAssay, InstrumentType, PreProcessingSoftware, SampleLevelQc, SampleQc,
    SoftwareName,
};
use crate::version::Version;

/// Record format maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatLevel {
    /// Base NPX export (L1).
    L1,
    /// Base export plus derived and corrected quantities (L2).
    L2,
}

impl FormatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatLevel::L1 => "L1",
            FormatLevel::L2 => "L2",
        }
    }
}

impl fmt::Display for FormatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sample–assay measurement in the base export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlinkL1Record {
    #[serde(rename = "SampleID")]
    pub sample_id: String,
    #[serde(rename = "SampleType")]
    pub sample_type: String,
    #[serde(rename = "WellID")]
    pub well_id: String,
    #[serde(rename = "PlateID")]
    pub plate_id: String,
    #[serde(rename = "DataAnalysisRefID")]
    pub data_analysis_ref_id: String,
    #[serde(rename = "OlinkID")]
    pub olink_id: String,
    #[serde(rename = "UniProt")]
    pub uniprot: String,
    #[serde(rename = "Assay")]
    pub assay: String,
    #[serde(rename = "AssayType")]
    pub assay_type: String,
    #[serde(rename = "Panel")]
    pub panel: String,
    #[serde(rename = "Block")]
    pub block: String,
    #[serde(rename = "Count")]
    pub count: i64,
    #[serde(rename = "ExtNPX")]
    pub ext_npx: f64,
    #[serde(rename = "NPX")]
    pub npx: f64,
    #[serde(rename = "Normalization")]
    pub normalization: String,
    #[serde(rename = "PCNormalizedNPX")]
    pub pc_normalized_npx: f64,
    #[serde(rename = "AssayQC")]
    pub assay_qc: String,
    #[serde(rename = "SampleQC")]
    pub sample_qc: SampleQc,
    #[serde(rename = "SoftwareVersion")]
    pub software_version: Version,
    #[serde(rename = "SoftwareName")]
    pub software_name: SoftwareName,
    #[serde(rename = "PanelDataArchiveVersion")]
    pub panel_data_archive_version: Version,
    #[serde(rename = "PreProcessingVersion")]
    pub pre_processing_version: Version,
    #[serde(rename = "PreProcessingSoftware")]
    pub pre_processing_software: PreProcessingSoftware,
    #[serde(rename = "InstrumentType")]
    pub instrument_type: InstrumentType,
    #[serde(rename = "IntraCV")]
    pub intra_cv: f64,
    #[serde(rename = "InterCV")]
    pub inter_cv: f64,
    /// 0 or 1.
    #[serde(rename = "SampleBlockQCWarn")]
    pub sample_block_qc_warn: i64,
    /// 0 or 1.
    #[serde(rename = "SampleBlockQCFail")]
    pub sample_block_qc_fail: i64,
    /// 0 or 1.
    #[serde(rename = "AssayQCWarn")]
    pub assay_qc_warn: i64,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "KitLot")]
    pub kit_lot: String,
    #[serde(rename = "PCLot")]
    pub pc_lot: String,
    #[serde(rename = "SCLot")]
    pub sc_lot: String,
    #[serde(rename = "NCLot")]
    pub nc_lot: String,
    #[serde(rename = "AssayTechIssue")]
    pub assay_tech_issue: String,
    // TODO: enforce the Plate-Well-SampleID composition once exports agree on a separator.
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
}

/// An extended (L2) record: every L1 field plus derived quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlinkL2Record {
    #[serde(flatten)]
    pub base: OlinkL1Record,
    #[serde(rename = "Median")]
    pub median: f64,
    #[serde(rename = "Variance")]
    pub variance: f64,
    #[serde(rename = "ReferenceMedian")]
    pub reference_median: f64,
    #[serde(rename = "Correction")]
    pub correction: f64,
    #[serde(rename = "ExtNPX_Corrected")]
    pub ext_npx_corrected: f64,
    #[serde(rename = "LogProtExp")]
    pub log_prot_exp: f64,
    #[serde(rename = "LogProtExp_Raw")]
    pub log_prot_exp_raw: f64,
    #[serde(rename = "high_var_assay")]
    pub high_var_assay: HighVarAssay,
    #[serde(rename = "sample_level_qc")]
    pub sample_level_qc: SampleLevelQc,
    #[serde(rename = "assay_level_qc")]
    pub assay_level_qc: AssayLevelQc,
}

impl From<OlinkL2Record> for OlinkL1Record {
    fn from(record: OlinkL2Record) -> Self {
        record.base
    }
}
