//! Validation into typed L1 / L2 records.

use std::collections::BTreeMap;
use std::str::FromStr;

use tau_model::{FieldValue, FormatLevel, OlinkL1Record, OlinkL2Record, Version};

use crate::issue::{FieldViolation, ValidationError};
use crate::schema::RecordSchema;

/// Validate a raw record against the base schema and build an [`OlinkL1Record`].
pub fn validate_l1(record: &BTreeMap<String, FieldValue>) -> Result<OlinkL1Record, ValidationError> {
    let normalized = RecordSchema::base().validate(record)?;
    let fields = Normalized::new(&normalized, FormatLevel::L1);
    fields.l1()
}

/// Validate a raw record against the extended schema and build an [`OlinkL2Record`].
///
/// A record that passes here also passes [`validate_l1`].
pub fn validate_l2(record: &BTreeMap<String, FieldValue>) -> Result<OlinkL2Record, ValidationError> {
    let normalized = RecordSchema::extended().validate(record)?;
    let fields = Normalized::new(&normalized, FormatLevel::L2);
    Ok(OlinkL2Record {
        base: fields.l1()?,
        median: fields.float("Median")?,
        variance: fields.float("Variance")?,
        reference_median: fields.float("ReferenceMedian")?,
        correction: fields.float("Correction")?,
        ext_npx_corrected: fields.float("ExtNPX_Corrected")?,
        log_prot_exp: fields.float("LogProtExp")?,
        log_prot_exp_raw: fields.float("LogProtExp_Raw")?,
        high_var_assay: fields.category("high_var_assay")?,
        sample_level_qc: fields.category("sample_level_qc")?,
        assay_level_qc: fields.category("assay_level_qc")?,
    })
}

/// Read access to a schema-normalized field map.
///
/// Lookups only fail if the map did not come from the matching schema.
struct Normalized<'a> {
    values: &'a BTreeMap<String, FieldValue>,
    level: FormatLevel,
}

impl<'a> Normalized<'a> {
    fn new(values: &'a BTreeMap<String, FieldValue>, level: FormatLevel) -> Self {
        Self { values, level }
    }

    fn fail(&self, violation: FieldViolation) -> ValidationError {
        ValidationError {
            level: self.level,
            violations: vec![violation],
        }
    }

    fn get(&self, name: &str) -> Result<&'a FieldValue, ValidationError> {
        self.values.get(name).ok_or_else(|| {
            self.fail(FieldViolation::Missing {
                field: name.to_string(),
            })
        })
    }

    fn mismatch(&self, name: &str, expected: &'static str, found: &FieldValue) -> ValidationError {
        self.fail(FieldViolation::WrongType {
            field: name.to_string(),
            expected,
            found: found.kind_name(),
        })
    }

    fn text(&self, name: &str) -> Result<String, ValidationError> {
        match self.get(name)? {
            FieldValue::Text(text) => Ok(text.clone()),
            other => Err(self.mismatch(name, "text", other)),
        }
    }

    fn integer(&self, name: &str) -> Result<i64, ValidationError> {
        match self.get(name)? {
            FieldValue::Integer(number) => Ok(*number),
            other => Err(self.mismatch(name, "integer", other)),
        }
    }

    fn float(&self, name: &str) -> Result<f64, ValidationError> {
        match self.get(name)? {
            FieldValue::Float(number) => Ok(*number),
            other => Err(self.mismatch(name, "float", other)),
        }
    }

    fn version(&self, name: &str) -> Result<Version, ValidationError> {
        match self.get(name)? {
            FieldValue::Version(version) => Ok(version.clone()),
            other => Err(self.mismatch(name, "version", other)),
        }
    }

    fn category<T: FromStr>(&self, name: &str) -> Result<T, ValidationError> {
        let value = self.get(name)?;
        value
            .as_text()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| self.mismatch(name, "categorical text", value))
    }

    fn l1(&self) -> Result<OlinkL1Record, ValidationError> {
        Ok(OlinkL1Record {
            sample_id: self.text("SampleID")?,
            sample_type: self.text("SampleType")?,
            well_id: self.text("WellID")?,
            plate_id: self.text("PlateID")?,
            data_analysis_ref_id: self.text("DataAnalysisRefID")?,
            olink_id: self.text("OlinkID")?,
            uniprot: self.text("UniProt")?,
            assay: self.text("Assay")?,
            assay_type: self.text("AssayType")?,
            panel: self.text("Panel")?,
            block: self.text("Block")?,
            count: self.integer("Count")?,
            ext_npx: self.float("ExtNPX")?,
            npx: self.float("NPX")?,
            normalization: self.text("Normalization")?,
            pc_normalized_npx: self.float("PCNormalizedNPX")?,
            assay_qc: self.text("AssayQC")?,
            sample_qc: self.category("SampleQC")?,
            software_version: self.version("SoftwareVersion")?,
            software_name: self.category("SoftwareName")?,
            panel_data_archive_version: self.version("PanelDataArchiveVersion")?,
            pre_processing_version: self.version("PreProcessingVersion")?,
            pre_processing_software: self.category("PreProcessingSoftware")?,
            instrument_type: self.category("InstrumentType")?,
            intra_cv: self.float("IntraCV")?,
            inter_cv: self.float("InterCV")?,
            sample_block_qc_warn: self.integer("SampleBlockQCWarn")?,
            sample_block_qc_fail: self.integer("SampleBlockQCFail")?,
            assay_qc_warn: self.integer("AssayQCWarn")?,
            project: self.text("Project")?,
            kit_lot: self.text("KitLot")?,
            pc_lot: self.text("PCLot")?,
            sc_lot: self.text("SCLot")?,
            nc_lot: self.text("NCLot")?,
            assay_tech_issue: self.text("AssayTechIssue")?,
            unique_id: self.text("UniqueID")?,
        })
    }
}
