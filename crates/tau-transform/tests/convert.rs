//! Tests for converting long-format tables into containers.

use ndarray::Array2;
use polars::prelude::*;
use proptest::prelude::*;
use tau_ingest::column_labels;
use tau_model::FieldValue;
use tau_transform::{
    AnnotatedContainer, ConversionConfig, ConvertError, DuplicatePolicy, LayerAxis, convert,
};

fn three_row_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("sample".into(), vec!["S1", "S1", "S2"]).into(),
        Series::new("Assay".into(), vec!["A1", "A2", "A1"]).into(),
        Series::new("NPX".into(), vec![1.1f64, 2.2, 3.3]).into(),
        Series::new("SampleQC".into(), vec!["Pass", "Pass", "Warn"]).into(),
    ])
    .unwrap()
}

fn export_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("SampleID".into(), vec!["S1", "S1", "S2", "S2", "S3"]).into(),
        Series::new("Assay".into(), vec!["IL6", "TNF", "TNF", "IL6", "IL6"]).into(),
        Series::new("OlinkID".into(), vec!["OID1", "OID2", "OID2", "OID1", "OID1"]).into(),
        Series::new("NPX".into(), vec![1.0f64, 2.0, 3.0, 4.0, 5.0]).into(),
        Series::new("ExtNPX".into(), vec![Some(1.5f64), None, Some(3.5), Some(4.5), Some(5.5)])
            .into(),
        Series::new("WellID".into(), vec!["A1", "A1", "B1", "B1", "C1"]).into(),
        Series::new("Count".into(), vec![10i64, 20, 30, 40, 50]).into(),
        Series::new("SampleQC".into(), vec!["Pass", "Pass", "Warn", "Warn", "Fail"]).into(),
        Series::new("PlateID".into(), vec![Some("P1"), Some("P1"), Some("P1"), None, Some("P2")])
            .into(),
    ])
    .unwrap()
}

fn same_matrix(left: &Array2<f64>, right: &Array2<f64>) -> bool {
    left.dim() == right.dim()
        && left
            .iter()
            .zip(right.iter())
            .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
}

fn assert_axes_consistent(container: &AnnotatedContainer) {
    for layer in container.layers() {
        assert_eq!(layer.rows, container.obs().index(), "layer {}", layer.key);
        assert_eq!(layer.columns, container.var().index(), "layer {}", layer.key);
        assert_eq!(layer.shape(), container.shape(), "layer {}", layer.key);
    }
}

#[test]
fn test_three_row_npx_table() {
    let container = convert(&three_row_frame(), &ConversionConfig::new("NPX", "sample")).unwrap();

    assert_eq!(container.obs().index().to_vec(), vec!["S1", "S2"]);
    assert_eq!(container.var().index().to_vec(), vec!["A1", "A2"]);
    let x = container.x();
    assert_eq!(x.dim(), (2, 2));
    assert_eq!(x[[0, 0]], 1.1);
    assert_eq!(x[[0, 1]], 2.2);
    assert_eq!(x[[1, 0]], 3.3);
    assert!(x[[1, 1]].is_nan());
    assert_eq!(
        column_labels(container.obs().data(), "SampleQC").unwrap(),
        vec![Some("Pass".to_string()), Some("Warn".to_string())]
    );
    assert_eq!(container.primary_key(), "NPX");
    assert_axes_consistent(&container);
}

#[test]
fn test_missing_selector_column() {
    let err = convert(
        &three_row_frame(),
        &ConversionConfig::new("ExtNPX", "sample"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MissingColumn { ref column } if column == "ExtNPX"
    ));
    insta::assert_snapshot!(err.to_string(), @"column 'ExtNPX' not found");
}

#[test]
fn test_selector_must_be_a_layer() {
    let config = ConversionConfig::new("Count", "SampleID");
    let err = convert(&export_frame(), &config).unwrap_err();
    assert!(matches!(err, ConvertError::MissingColumn { .. }));

    let config = config.with_extra_layer_columns(["Count"]);
    let container = convert(&export_frame(), &config).unwrap();
    assert_eq!(container.x()[[0, 0]], 10.0);
}

#[test]
fn test_text_selector_rejected() {
    let err = convert(&export_frame(), &ConversionConfig::new("WellID", "SampleID")).unwrap_err();
    assert!(matches!(err, ConvertError::NonNumericLayer { ref layer } if layer == "WellID"));
}

#[test]
fn test_export_destinations() {
    let container = convert(&export_frame(), &ConversionConfig::new("NPX", "SampleID")).unwrap();

    assert_eq!(container.shape(), (3, 2));
    assert_eq!(container.layer_keys(), vec!["WellID", "ExtNPX", "NPX"]);
    assert_eq!(container.var().index_name(), "Assay");
    assert_eq!(container.var().index().to_vec(), vec!["IL6", "TNF"]);
    assert_eq!(
        column_labels(container.var().data(), "OlinkID").unwrap(),
        vec![Some("OID1".to_string()), Some("OID2".to_string())]
    );

    // Dataset metadata keeps every row, nulls included.
    assert_eq!(
        container.uns()["PlateID"],
        vec![
            FieldValue::from("P1"),
            FieldValue::from("P1"),
            FieldValue::from("P1"),
            FieldValue::Null,
            FieldValue::from("P2"),
        ]
    );

    let wells = container.layer("WellID").unwrap().as_categorical().unwrap();
    assert_eq!(wells[[1, 1]].as_deref(), Some("B1"));
    assert_eq!(wells[[2, 1]], None);

    let ext = container.layer("ExtNPX").unwrap().as_numeric().unwrap();
    assert!(ext[[0, 1]].is_nan());
    assert_eq!(ext[[1, 0]], 4.5);
    assert!(container.layer("Count").is_none());
    assert_axes_consistent(&container);
}

#[test]
fn test_conversion_is_idempotent() {
    let df = export_frame();
    let config = ConversionConfig::new("NPX", "SampleID").with_extra_layer_columns(["Count"]);
    let first = convert(&df, &config).unwrap();
    let second = convert(&df, &config).unwrap();

    assert!(same_matrix(first.x(), second.x()));
    assert_eq!(first.obs().index(), second.obs().index());
    assert_eq!(first.var().index(), second.var().index());
    assert!(first.obs().data().equals_missing(second.obs().data()));
    assert_eq!(first.uns(), second.uns());
    assert_eq!(first.layer_keys(), second.layer_keys());
    for (left, right) in first.layers().iter().zip(second.layers()) {
        match (left.as_numeric(), right.as_numeric()) {
            (Some(a), Some(b)) => assert!(same_matrix(a, b)),
            _ => assert_eq!(left, right),
        }
    }
}

fn duplicated_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("SampleID".into(), vec!["S1", "S1", "S1"]).into(),
        Series::new("Assay".into(), vec!["IL6", "TNF", "IL6"]).into(),
        Series::new("NPX".into(), vec![1.0f64, 2.0, 9.0]).into(),
    ])
    .unwrap()
}

#[test]
fn test_duplicates_rejected_by_default() {
    let err = convert(&duplicated_frame(), &ConversionConfig::new("NPX", "SampleID")).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"layer 'NPX' has more than one value for sample 'S1', assay 'IL6'"
    );
}

#[test]
fn test_duplicate_policies() {
    let config = ConversionConfig::new("NPX", "SampleID");
    let first = convert(
        &duplicated_frame(),
        &config.clone().with_duplicate_policy(DuplicatePolicy::KeepFirst),
    )
    .unwrap();
    assert_eq!(first.x()[[0, 0]], 1.0);

    let last = convert(
        &duplicated_frame(),
        &config.with_duplicate_policy(DuplicatePolicy::KeepLast),
    )
    .unwrap();
    assert_eq!(last.x()[[0, 0]], 9.0);
    assert_eq!(last.x()[[0, 1]], 2.0);
}

#[test]
fn test_numeric_sample_ids_become_labels() {
    let df = DataFrame::new(vec![
        Series::new("SubjectRef".into(), vec![101i64, 102]).into(),
        Series::new("Assay".into(), vec!["IL6", "IL6"]).into(),
        Series::new("NPX".into(), vec![0.5f64, 0.25]).into(),
    ])
    .unwrap();
    let container = convert(&df, &ConversionConfig::new("NPX", "SubjectRef")).unwrap();
    assert_eq!(container.obs().index().to_vec(), vec!["101", "102"]);
    assert_eq!(container.x()[[1, 0]], 0.25);
}

#[test]
fn test_axis_mismatch_reports_axis() {
    let err = ConvertError::AxisMismatch {
        layer: "NPX".to_string(),
        axis: LayerAxis::Obs,
        missing: vec!["S2".to_string()],
        unexpected: vec![],
    };
    assert!(err.to_string().contains("obs labels"));
}

proptest! {
    #[test]
    fn prop_every_cell_lands_once(
        cells in prop::collection::btree_map((0u8..6, 0u8..6), -10.0f64..10.0, 1..30)
    ) {
        let samples: Vec<String> = cells.keys().map(|(s, _)| format!("S{s}")).collect();
        let assays: Vec<String> = cells.keys().map(|(_, a)| format!("A{a}")).collect();
        let values: Vec<f64> = cells.values().copied().collect();
        let df = DataFrame::new(vec![
            Series::new("SampleID".into(), samples).into(),
            Series::new("Assay".into(), assays).into(),
            Series::new("NPX".into(), values).into(),
        ])
        .unwrap();

        let container = convert(&df, &ConversionConfig::new("NPX", "SampleID")).unwrap();
        assert_axes_consistent(&container);

        let obs = container.obs().index();
        let var = container.var().index();
        for ((s, a), value) in &cells {
            let row = obs.iter().position(|label| *label == format!("S{s}")).unwrap();
            let column = var.iter().position(|label| *label == format!("A{a}")).unwrap();
            prop_assert_eq!(container.x()[[row, column]], *value);
        }
        let filled = container.x().iter().filter(|value| !value.is_nan()).count();
        prop_assert_eq!(filled, cells.len());
    }
}
