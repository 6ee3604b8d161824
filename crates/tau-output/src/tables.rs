//! Conversion of layers into writable DataFrames.

use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};
use tau_transform::{LayerMatrix, LayerValues};

/// A layer as a wide table: the sample index first, then one column per assay.
pub fn layer_frame(layer: &LayerMatrix, index_name: &str) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(layer.columns.len() + 1);
    columns.push(Series::new(index_name.into(), layer.rows.clone()).into());
    for (idx, assay) in layer.columns.iter().enumerate() {
        let series = match &layer.values {
            LayerValues::Numeric(values) => {
                Series::new(assay.as_str().into(), values.column(idx).to_vec())
            }
            LayerValues::Categorical(values) => {
                Series::new(assay.as_str().into(), values.column(idx).to_vec())
            }
        };
        columns.push(series.into());
    }
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_layer_frame_layout() {
        let layer = LayerMatrix {
            key: "NPX".to_string(),
            rows: vec!["S1".to_string(), "S2".to_string()],
            columns: vec!["A1".to_string(), "A2".to_string()],
            values: LayerValues::Numeric(array![[1.0, 2.0], [3.0, f64::NAN]]),
        };
        let df = layer_frame(&layer, "SampleID").unwrap();
        assert_eq!(df.shape(), (2, 3));
        let a2 = df.column("A2").unwrap().f64().unwrap();
        assert_eq!(a2.get(0), Some(2.0));
        assert!(a2.get(1).is_some_and(f64::is_nan));
    }

    #[test]
    fn test_categorical_layer_keeps_nulls() {
        let layer = LayerMatrix {
            key: "WellID".to_string(),
            rows: vec!["S1".to_string()],
            columns: vec!["A1".to_string(), "A2".to_string()],
            values: LayerValues::Categorical(array![[Some("A1".to_string()), None]]),
        };
        let df = layer_frame(&layer, "SampleID").unwrap();
        assert_eq!(df.column("A2").unwrap().null_count(), 1);
    }
}
