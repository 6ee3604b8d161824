//! Tests for writing containers to disk.

use std::fs;

use polars::prelude::*;
use tau_output::{MANIFEST_FILE, Manifest, WriteOptions, write_container};
use tau_transform::{AnnotatedContainer, ConversionConfig, convert};

fn container() -> AnnotatedContainer {
    let df = DataFrame::new(vec![
        Series::new("SampleID".into(), vec!["S1", "S1", "S2"]).into(),
        Series::new("Assay".into(), vec!["IL6", "TNF", "IL6"]).into(),
        Series::new("NPX".into(), vec![1.5f64, 2.5, 3.5]).into(),
        Series::new("WellID".into(), vec!["A1", "A1", "B1"]).into(),
        Series::new("SampleQC".into(), vec!["Pass", "Pass", "Warn"]).into(),
        Series::new("SoftwareVersion".into(), vec!["1.4.0", "1.4.0", "1.4.0"]).into(),
    ])
    .unwrap();
    convert(&df, &ConversionConfig::new("NPX", "SampleID")).unwrap()
}

#[test]
fn test_directory_layout() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("run1");
    let written = write_container(&container(), &out, &WriteOptions::default()).unwrap();

    for file in &written.files {
        assert!(out.join(file).is_file(), "{} missing", file.display());
    }
    assert!(out.join("layers/NPX.csv").is_file());
    assert!(out.join("layers/WellID.csv").is_file());
    assert_eq!(written.files.len(), 7);

    let x = fs::read_to_string(out.join("X.csv")).unwrap();
    let mut lines = x.lines();
    assert_eq!(lines.next(), Some("SampleID,IL6,TNF"));
    assert_eq!(lines.next(), Some("S1,1.5,2.5"));

    let obs = fs::read_to_string(out.join("obs.csv")).unwrap();
    assert_eq!(obs.lines().next(), Some("SampleID,SampleQC"));
    assert_eq!(obs.lines().count(), 3);

    let uns: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("uns.json")).unwrap()).unwrap();
    assert_eq!(
        uns["SoftwareVersion"],
        serde_json::json!(["1.4.0", "1.4.0", "1.4.0"])
    );
}

#[test]
fn test_manifest_records_source_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("run1.csv");
    fs::write(&source, b"hello").unwrap();
    let out = dir.path().join("out");
    write_container(
        &container(),
        &out,
        &WriteOptions::default().with_source(&source),
    )
    .unwrap();

    let manifest: Manifest =
        serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest.primary_layer, "NPX");
    assert_eq!((manifest.n_obs, manifest.n_vars), (2, 2));
    assert_eq!(manifest.obs_index, "SampleID");
    assert_eq!(manifest.var_index, "Assay");
    assert_eq!(manifest.layers, vec!["WellID", "NPX"]);
    assert_eq!(manifest.uns_keys, vec!["SoftwareVersion"]);
    assert_eq!(manifest.tool_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(
        manifest.source.unwrap().sha256,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_missing_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let options = WriteOptions::default().with_source(dir.path().join("absent.parquet"));
    assert!(write_container(&container(), &dir.path().join("out"), &options).is_err());
}
