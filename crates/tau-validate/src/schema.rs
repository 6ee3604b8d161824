//! Declarative record schemas for the base (L1) and extended (L2) formats.
//!
//! A schema is an ordered list of [`FieldRule`]s. Every declared field is
//! required. The extended schema is built from the base schema plus the
//! derived-field rules, so anything the base schema rejects the extended
//! schema rejects too.

use std::collections::BTreeMap;

use tau_model::{
    AssayLevelQc, FieldValue, FormatLevel, HighVarAssay, InstrumentType, PreProcessingSoftware,
    SampleLevelQc, SampleQc, SoftwareName, Version,
};

use crate::issue::{FieldViolation, ValidationError};

/// Expected shape of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Version,
    /// Text restricted to an exact closed set.
    Categorical(&'static [&'static str]),
    /// Integer restricted to an inclusive range.
    BoundedInteger { min: i64, max: i64 },
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Version => "version",
            FieldKind::Categorical(_) => "categorical text",
            FieldKind::BoundedInteger { .. } => "bounded integer",
        }
    }
}

/// A required field and the kind its value must conform to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    /// Check one value, returning it normalized to the rule's kind.
    ///
    /// Integers accept integral floats and integer text; floats accept
    /// integers and numeric text; versions accept parseable text. Text and
    /// categorical fields accept text only.
    pub fn check(&self, value: Option<&FieldValue>) -> Result<FieldValue, FieldViolation> {
        let Some(value) = value else {
            return Err(FieldViolation::Missing {
                field: self.name.to_string(),
            });
        };
        match self.kind {
            FieldKind::Text => match value {
                FieldValue::Text(text) => Ok(FieldValue::Text(text.clone())),
                other => Err(self.wrong_type(other)),
            },
            FieldKind::Integer => coerce_integer(value)
                .map(FieldValue::Integer)
                .ok_or_else(|| self.wrong_type(value)),
            FieldKind::Float => coerce_float(value)
                .map(FieldValue::Float)
                .ok_or_else(|| self.wrong_type(value)),
            FieldKind::Version => match value {
                FieldValue::Version(version) => Ok(FieldValue::Version(version.clone())),
                FieldValue::Text(text) => text
                    .parse::<Version>()
                    .map(FieldValue::Version)
                    .map_err(|error| FieldViolation::InvalidVersion {
                        field: self.name.to_string(),
                        error,
                    }),
                other => Err(self.wrong_type(other)),
            },
            FieldKind::Categorical(allowed) => match value {
                FieldValue::Text(text) if allowed.contains(&text.as_str()) => {
                    Ok(FieldValue::Text(text.clone()))
                }
                FieldValue::Text(text) => Err(FieldViolation::NotAllowed {
                    field: self.name.to_string(),
                    value: text.clone(),
                    allowed,
                }),
                other => Err(self.wrong_type(other)),
            },
            FieldKind::BoundedInteger { min, max } => {
                let number = coerce_integer(value).ok_or_else(|| self.wrong_type(value))?;
                if (min..=max).contains(&number) {
                    Ok(FieldValue::Integer(number))
                } else {
                    Err(FieldViolation::OutOfRange {
                        field: self.name.to_string(),
                        value: number,
                        min,
                        max,
                    })
                }
            }
        }
    }

    fn wrong_type(&self, found: &FieldValue) -> FieldViolation {
        FieldViolation::WrongType {
            field: self.name.to_string(),
            expected: self.kind.name(),
            found: found.kind_name(),
        }
    }
}

fn coerce_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Integer(number) => Some(*number),
        FieldValue::Float(number)
            if number.is_finite()
                && number.fract() == 0.0
                && *number >= i64::MIN as f64
                && *number < i64::MAX as f64 =>
        {
            Some(*number as i64)
        }
        FieldValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_float(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Float(number) => Some(*number),
        FieldValue::Integer(number) => Some(*number as f64),
        FieldValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

const FLAG: FieldKind = FieldKind::BoundedInteger { min: 0, max: 1 };

/// Field rules of the base NPX export, in export column order.
pub const L1_FIELDS: &[FieldRule] = &[
    FieldRule::new("SampleID", FieldKind::Text),
    FieldRule::new("SampleType", FieldKind::Text),
    FieldRule::new("WellID", FieldKind::Text),
    FieldRule::new("PlateID", FieldKind::Text),
    FieldRule::new("DataAnalysisRefID", FieldKind::Text),
    FieldRule::new("OlinkID", FieldKind::Text),
    FieldRule::new("UniProt", FieldKind::Text),
    FieldRule::new("Assay", FieldKind::Text),
    FieldRule::new("AssayType", FieldKind::Text),
    FieldRule::new("Panel", FieldKind::Text),
    FieldRule::new("Block", FieldKind::Text),
    FieldRule::new("Count", FieldKind::Integer),
    FieldRule::new("ExtNPX", FieldKind::Float),
    FieldRule::new("NPX", FieldKind::Float),
    FieldRule::new("Normalization", FieldKind::Text),
    FieldRule::new("PCNormalizedNPX", FieldKind::Float),
    FieldRule::new("AssayQC", FieldKind::Text),
    FieldRule::new("SampleQC", FieldKind::Categorical(SampleQc::VALUES)),
    FieldRule::new("SoftwareVersion", FieldKind::Version),
    FieldRule::new("SoftwareName", FieldKind::Categorical(SoftwareName::VALUES)),
    FieldRule::new("PanelDataArchiveVersion", FieldKind::Version),
    FieldRule::new("PreProcessingVersion", FieldKind::Version),
    FieldRule::new(
        "PreProcessingSoftware",
        FieldKind::Categorical(PreProcessingSoftware::VALUES),
    ),
    FieldRule::new(
        "InstrumentType",
        FieldKind::Categorical(InstrumentType::VALUES),
    ),
    FieldRule::new("IntraCV", FieldKind::Float),
    FieldRule::new("InterCV", FieldKind::Float),
    FieldRule::new("SampleBlockQCWarn", FLAG),
    FieldRule::new("SampleBlockQCFail", FLAG),
    FieldRule::new("AssayQCWarn", FLAG),
    FieldRule::new("Project", FieldKind::Text),
    FieldRule::new("KitLot", FieldKind::Text),
    FieldRule::new("PCLot", FieldKind::Text),
    FieldRule::new("SCLot", FieldKind::Text),
    FieldRule::new("NCLot", FieldKind::Text),
    FieldRule::new("AssayTechIssue", FieldKind::Text),
    FieldRule::new("UniqueID", FieldKind::Text),
];

/// Derived fields the extended format adds on top of [`L1_FIELDS`].
pub const L2_EXTRA_FIELDS: &[FieldRule] = &[
    FieldRule::new("Median", FieldKind::Float),
    FieldRule::new("Variance", FieldKind::Float),
    FieldRule::new("ReferenceMedian", FieldKind::Float),
    FieldRule::new("Correction", FieldKind::Float),
    FieldRule::new("ExtNPX_Corrected", FieldKind::Float),
    FieldRule::new("LogProtExp", FieldKind::Float),
    FieldRule::new("LogProtExp_Raw", FieldKind::Float),
    FieldRule::new(
        "high_var_assay",
        FieldKind::Categorical(HighVarAssay::VALUES),
    ),
    FieldRule::new(
        "sample_level_qc",
        FieldKind::Categorical(SampleLevelQc::VALUES),
    ),
    FieldRule::new(
        "assay_level_qc",
        FieldKind::Categorical(AssayLevelQc::VALUES),
    ),
];

/// An ordered set of required field rules for one format level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    level: FormatLevel,
    rules: Vec<FieldRule>,
}

impl RecordSchema {
    /// Schema of the base export format.
    pub fn base() -> Self {
        Self {
            level: FormatLevel::L1,
            rules: L1_FIELDS.to_vec(),
        }
    }

    /// Schema of the extended format: the base rules plus the derived fields.
    pub fn extended() -> Self {
        Self::base().extend(FormatLevel::L2, L2_EXTRA_FIELDS)
    }

    /// Schema for a format level.
    pub fn for_level(level: FormatLevel) -> Self {
        match level {
            FormatLevel::L1 => Self::base(),
            FormatLevel::L2 => Self::extended(),
        }
    }

    /// Compose a new schema from this one plus additional rules.
    ///
    /// A rule whose name is already declared replaces nothing: the existing
    /// rule is kept and the duplicate ignored.
    #[must_use]
    pub fn extend(mut self, level: FormatLevel, extra: &[FieldRule]) -> Self {
        for rule in extra {
            if !self.rules.iter().any(|existing| existing.name == rule.name) {
                self.rules.push(*rule);
            }
        }
        self.level = level;
        self
    }

    pub fn level(&self) -> FormatLevel {
        self.level
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Declared field names, in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    /// Fields whose value must arrive as text (plain or categorical).
    ///
    /// Readers keep these columns as strings so that numeric-looking text
    /// such as `Block` = `1` is not typed as a number.
    pub fn text_fields(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| matches!(rule.kind, FieldKind::Text | FieldKind::Categorical(_)))
            .map(|rule| rule.name)
            .collect()
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Validate one record, reporting every violated field.
    ///
    /// On success returns the declared fields normalized to their kinds
    /// (versions parsed, numeric text converted). Undeclared fields are
    /// ignored and not returned.
    pub fn validate(
        &self,
        record: &BTreeMap<String, FieldValue>,
    ) -> Result<BTreeMap<String, FieldValue>, ValidationError> {
        let mut normalized = BTreeMap::new();
        let mut violations = Vec::new();
        for rule in &self.rules {
            match rule.check(record.get(rule.name)) {
                Ok(value) => {
                    normalized.insert(rule.name.to_string(), value);
                }
                Err(violation) => violations.push(violation),
            }
        }
        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError {
                level: self.level,
                violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_is_superset_of_base() {
        let base = RecordSchema::base();
        let extended = RecordSchema::extended();
        assert_eq!(extended.level(), FormatLevel::L2);
        for rule in base.rules() {
            assert_eq!(extended.rule(rule.name), Some(rule));
        }
        assert_eq!(
            extended.rules().len(),
            base.rules().len() + L2_EXTRA_FIELDS.len()
        );
    }

    #[test]
    fn test_extend_keeps_existing_rule() {
        let schema = RecordSchema::base().extend(
            FormatLevel::L2,
            &[FieldRule::new("NPX", FieldKind::Text)],
        );
        assert_eq!(schema.rule("NPX").unwrap().kind, FieldKind::Float);
        assert_eq!(schema.rules().len(), L1_FIELDS.len());
    }

    #[test]
    fn test_integer_coercion() {
        let rule = FieldRule::new("Count", FieldKind::Integer);
        assert_eq!(
            rule.check(Some(&FieldValue::Float(12.0))),
            Ok(FieldValue::Integer(12))
        );
        assert_eq!(
            rule.check(Some(&FieldValue::from("7"))),
            Ok(FieldValue::Integer(7))
        );
        assert!(rule.check(Some(&FieldValue::Float(1.5))).is_err());
        assert!(rule.check(Some(&FieldValue::Float(2f64.powi(63)))).is_err());
        assert_eq!(
            rule.check(Some(&FieldValue::Float(-(2f64.powi(63))))),
            Ok(FieldValue::Integer(i64::MIN))
        );
        assert!(rule.check(Some(&FieldValue::Null)).is_err());
    }

    #[test]
    fn test_text_fields() {
        let base = RecordSchema::base().text_fields();
        assert!(base.contains(&"Block"));
        assert!(base.contains(&"SampleQC"));
        assert!(!base.contains(&"Count"));
        assert!(!base.contains(&"SoftwareVersion"));
        let extended = RecordSchema::extended().text_fields();
        assert!(extended.contains(&"assay_level_qc"));
        assert!(!extended.contains(&"Median"));
    }

    #[test]
    fn test_float_accepts_integer() {
        let rule = FieldRule::new("NPX", FieldKind::Float);
        assert_eq!(
            rule.check(Some(&FieldValue::Integer(3))),
            Ok(FieldValue::Float(3.0))
        );
    }

    #[test]
    fn test_text_rejects_numbers() {
        let rule = FieldRule::new("PlateID", FieldKind::Text);
        let violation = rule.check(Some(&FieldValue::Integer(3))).unwrap_err();
        assert_eq!(
            violation,
            FieldViolation::WrongType {
                field: "PlateID".to_string(),
                expected: "text",
                found: "integer",
            }
        );
    }

    #[test]
    fn test_flag_bounds() {
        let rule = FieldRule::new("AssayQCWarn", FLAG);
        assert_eq!(
            rule.check(Some(&FieldValue::Integer(1))),
            Ok(FieldValue::Integer(1))
        );
        assert!(matches!(
            rule.check(Some(&FieldValue::Integer(2))),
            Err(FieldViolation::OutOfRange { value: 2, .. })
        ));
        assert!(matches!(
            rule.check(Some(&FieldValue::Integer(-1))),
            Err(FieldViolation::OutOfRange { value: -1, .. })
        ));
    }
}
