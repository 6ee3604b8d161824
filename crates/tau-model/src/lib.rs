//! Core types for NPX immunoassay records.
//!
//! - **version**: semantic versions for the provenance version fields
//! - **enums**: closed value sets for categorical fields
//! - **value**: the tagged [`FieldValue`] cell type
//! - **record**: typed L1 and L2 records produced by schema validation

pub mod enums;
pub mod record;
pub mod value;
pub mod version;

pub use enums::{
    AssayLevelQc, HighVarAssay, InstrumentType, PreProcessingSoftware, SampleLevelQc, SampleQc,
    SoftwareName, UnknownValue,
};
pub use record::{FormatLevel, OlinkL1Record, OlinkL2Record};
pub use value::FieldValue;
pub use version::{Identifier, Version, VersionError, VersionErrorReason};
