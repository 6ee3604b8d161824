//! Record validation for NPX exports.
//!
//! [`RecordSchema`] declares the required fields of the base (L1) and
//! extended (L2) record formats. Validation is pure: it never logs, and it
//! reports every violated field of a record rather than stopping at the
//! first.
//!
//! - [`RecordSchema::validate`]: raw record in, normalized fields or a
//!   [`ValidationError`] out
//! - [`validate_l1`] / [`validate_l2`]: the same, producing typed records
//! - [`validate_table`]: every row of a source table

mod issue;
mod schema;
mod table;
mod typed;

pub use issue::{FieldViolation, ValidationError};
pub use schema::{FieldKind, FieldRule, L1_FIELDS, L2_EXTRA_FIELDS, RecordSchema};
pub use table::{RowFailure, TableValidationReport, validate_table};
pub use typed::{validate_l1, validate_l2};
