//! Row-by-row validation of a whole source table.

use std::collections::BTreeMap;

use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;
use tau_ingest::row_record;
use tau_model::FormatLevel;

use crate::issue::ValidationError;
use crate::schema::RecordSchema;

/// A row that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// Zero-based row index in the source table.
    pub row: usize,
    pub error: ValidationError,
}

/// Aggregated result of validating every row of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableValidationReport {
    pub level: FormatLevel,
    pub rows_checked: usize,
    pub failures: Vec<RowFailure>,
    /// Violations per field across all rows.
    pub field_counts: BTreeMap<String, u64>,
}

impl TableValidationReport {
    pub fn invalid_rows(&self) -> usize {
        self.failures.len()
    }

    pub fn valid_rows(&self) -> usize {
        self.rows_checked - self.failures.len()
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate every row of `df` against `schema`.
///
/// Each row is checked independently and all of its violations are kept.
pub fn validate_table(df: &DataFrame, schema: &RecordSchema) -> PolarsResult<TableValidationReport> {
    let mut failures = Vec::new();
    let mut field_counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in 0..df.height() {
        let record = row_record(df, row)?;
        if let Err(error) = schema.validate(&record) {
            for violation in &error.violations {
                *field_counts.entry(violation.field().to_string()).or_default() += 1;
            }
            failures.push(RowFailure { row, error });
        }
    }
    Ok(TableValidationReport {
        level: schema.level(),
        rows_checked: df.height(),
        failures,
        field_counts,
    })
}
