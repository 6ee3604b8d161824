//! Field-level validation violations.
//!
//! Each variant carries only the data needed to explain one failed field.

use std::fmt;

use serde::Serialize;
use tau_model::{FormatLevel, VersionError};
use thiserror::Error;

/// One field of one record that does not satisfy its rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldViolation {
    /// Declared field absent from the record.
    Missing { field: String },
    /// Value of the wrong kind that could not be coerced.
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Categorical value outside its closed set.
    NotAllowed {
        field: String,
        value: String,
        allowed: &'static [&'static str],
    },
    /// Integer outside its inclusive bounds.
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
    /// Version-bearing text that is not a semantic version.
    InvalidVersion { field: String, error: VersionError },
}

impl FieldViolation {
    /// Field name (every violation has one).
    pub fn field(&self) -> &str {
        match self {
            FieldViolation::Missing { field }
            | FieldViolation::WrongType { field, .. }
            | FieldViolation::NotAllowed { field, .. }
            | FieldViolation::OutOfRange { field, .. }
            | FieldViolation::InvalidVersion { field, .. } => field,
        }
    }

    /// Stable short code for summaries.
    pub fn code(&self) -> &'static str {
        match self {
            FieldViolation::Missing { .. } => "missing",
            FieldViolation::WrongType { .. } => "wrong_type",
            FieldViolation::NotAllowed { .. } => "not_allowed",
            FieldViolation::OutOfRange { .. } => "out_of_range",
            FieldViolation::InvalidVersion { .. } => "invalid_version",
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::Missing { field } => write!(f, "{field}: missing"),
            FieldViolation::WrongType {
                field,
                expected,
                found,
            } => write!(f, "{field}: expected {expected}, found {found}"),
            FieldViolation::NotAllowed {
                field,
                value,
                allowed,
            } => write!(
                f,
                "{field}: '{value}' is not one of [{}]",
                allowed.join(", ")
            ),
            FieldViolation::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field}: {value} is outside [{min}, {max}]"),
            FieldViolation::InvalidVersion { field, error } => write!(f, "{field}: {error}"),
        }
    }
}

/// A record that violates one or more field rules.
///
/// Violations are collected for every field, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{level} record failed validation: {}", join_violations(.violations))]
pub struct ValidationError {
    pub level: FormatLevel,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Names of the failing fields, in schema order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(FieldViolation::field).collect()
    }

    /// The violation recorded for `field`, if any.
    pub fn violation_for(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field() == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
