//! On-disk output for annotated containers.
//!
//! [`write_container`] lays a container out as a directory of CSV tables
//! plus JSON metadata and a provenance manifest.

mod common;
mod tables;
mod writer;

pub use common::{compute_file_sha256, ensure_output_dir, ensure_parent_dir};
pub use tables::layer_frame;
pub use writer::{
    MANIFEST_FILE, Manifest, SourceInfo, WriteOptions, WrittenFiles, write_container,
};
