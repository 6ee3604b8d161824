//! Long-to-wide pivot of one layer column.

use std::collections::HashMap;

use ndarray::{Array2, Axis};
use polars::prelude::{DataFrame, DataType};
use tau_ingest::{column_labels, is_numeric_dtype};

use crate::config::DuplicatePolicy;
use crate::error::{ConvertError, Result};

/// Cell values of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerValues {
    /// Numeric layer; absent cells are `NaN`.
    Numeric(Array2<f64>),
    /// Text layer; absent cells are `None`.
    Categorical(Array2<Option<String>>),
}

impl LayerValues {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            LayerValues::Numeric(values) => values.dim(),
            LayerValues::Categorical(values) => values.dim(),
        }
    }

    fn select(&self, rows: &[usize], columns: &[usize]) -> Self {
        match self {
            LayerValues::Numeric(values) => {
                LayerValues::Numeric(values.select(Axis(0), rows).select(Axis(1), columns))
            }
            LayerValues::Categorical(values) => {
                LayerValues::Categorical(values.select(Axis(0), rows).select(Axis(1), columns))
            }
        }
    }
}

/// A sample-by-assay matrix for one source column.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMatrix {
    pub key: String,
    /// Sample labels, one per row.
    pub rows: Vec<String>,
    /// Assay labels, one per column.
    pub columns: Vec<String>,
    pub values: LayerValues,
}

impl LayerMatrix {
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, LayerValues::Numeric(_))
    }

    pub fn as_numeric(&self) -> Option<&Array2<f64>> {
        match &self.values {
            LayerValues::Numeric(values) => Some(values),
            LayerValues::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&Array2<Option<String>>> {
        match &self.values {
            LayerValues::Categorical(values) => Some(values),
            LayerValues::Numeric(_) => None,
        }
    }

    /// Rearrange rows and columns into the given label order.
    ///
    /// Returns `None` unless both label lists are permutations of the
    /// layer's own labels.
    pub fn reordered(&self, rows: &[String], columns: &[String]) -> Option<Self> {
        let row_idx = permutation(&self.rows, rows)?;
        let column_idx = permutation(&self.columns, columns)?;
        Some(Self {
            key: self.key.clone(),
            rows: rows.to_vec(),
            columns: columns.to_vec(),
            values: self.values.select(&row_idx, &column_idx),
        })
    }
}

fn permutation(current: &[String], target: &[String]) -> Option<Vec<usize>> {
    if current.len() != target.len() {
        return None;
    }
    let position: HashMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(idx, label)| (label.as_str(), idx))
        .collect();
    target
        .iter()
        .map(|label| position.get(label.as_str()).copied())
        .collect()
}

/// Labels in first-seen order plus the position of every source row.
struct AxisLabels {
    labels: Vec<String>,
    positions: Vec<usize>,
}

fn axis_labels(df: &DataFrame, column: &str) -> Result<AxisLabels> {
    let raw = column_labels(df, column).map_err(|_| ConvertError::missing(column))?;
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::new();
    let mut positions = Vec::with_capacity(raw.len());
    for (row, label) in raw.into_iter().enumerate() {
        let label = label.ok_or_else(|| ConvertError::NullIdentifier {
            column: column.to_string(),
            row,
        })?;
        let next = labels.len();
        let position = *index.entry(label.clone()).or_insert(next);
        if position == next {
            labels.push(label);
        }
        positions.push(position);
    }
    Ok(AxisLabels { labels, positions })
}

/// Pivot `key` into a sample-by-assay matrix.
///
/// Samples become rows and assays columns, each in first-seen order. Numeric
/// and boolean columns produce a numeric layer; any other dtype produces a
/// text layer. Repeated (sample, assay) pairs are resolved by `policy`.
pub fn pivot_layer(
    df: &DataFrame,
    key: &str,
    sample_column: &str,
    assay_column: &str,
    policy: DuplicatePolicy,
) -> Result<LayerMatrix> {
    let source = df.column(key).map_err(|_| ConvertError::missing(key))?;
    let samples = axis_labels(df, sample_column)?;
    let assays = axis_labels(df, assay_column)?;
    let cells = Cells {
        key,
        samples: &samples,
        assays: &assays,
        policy,
    };

    let values = if is_numeric_dtype(source.dtype()) {
        let cast = source.cast(&DataType::Float64)?;
        let numbers = cast.f64()?;
        LayerValues::Numeric(cells.place(
            numbers.into_iter().map(|value| value.unwrap_or(f64::NAN)),
            f64::NAN,
        )?)
    } else {
        LayerValues::Categorical(cells.place(column_labels(df, key)?, None)?)
    };

    Ok(LayerMatrix {
        key: key.to_string(),
        rows: samples.labels,
        columns: assays.labels,
        values,
    })
}

struct Cells<'a> {
    key: &'a str,
    samples: &'a AxisLabels,
    assays: &'a AxisLabels,
    policy: DuplicatePolicy,
}

impl Cells<'_> {
    fn place<T: Clone>(&self, values: impl IntoIterator<Item = T>, fill: T) -> Result<Array2<T>> {
        let shape = (self.samples.labels.len(), self.assays.labels.len());
        let mut matrix = Array2::from_elem(shape, fill);
        let mut filled = Array2::from_elem(shape, false);
        let positions = self.samples.positions.iter().zip(&self.assays.positions);
        for ((&row, &column), value) in positions.zip(values) {
            if filled[[row, column]] {
                match self.policy {
                    DuplicatePolicy::Reject => {
                        return Err(ConvertError::DuplicateEntry {
                            layer: self.key.to_string(),
                            sample: self.samples.labels[row].clone(),
                            assay: self.assays.labels[column].clone(),
                        });
                    }
                    DuplicatePolicy::KeepFirst => continue,
                    DuplicatePolicy::KeepLast => {}
                }
            }
            matrix[[row, column]] = value;
            filled[[row, column]] = true;
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn long_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("SampleID".into(), vec!["S1", "S1", "S2"]).into(),
            Series::new("Assay".into(), vec!["A1", "A2", "A1"]).into(),
            Series::new("NPX".into(), vec![Some(1.1f64), Some(2.2), None]).into(),
            Series::new("WellID".into(), vec!["A1", "A1", "B1"]).into(),
            Series::new("SampleBlockQCFail".into(), vec![0i64, 1, 0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_numeric_pivot_first_seen_order() {
        let layer = pivot_layer(
            &long_frame(),
            "NPX",
            "SampleID",
            "Assay",
            DuplicatePolicy::Reject,
        )
        .unwrap();
        assert_eq!(layer.rows, vec!["S1", "S2"]);
        assert_eq!(layer.columns, vec!["A1", "A2"]);
        let values = layer.as_numeric().unwrap();
        assert_eq!(values[[0, 0]], 1.1);
        assert_eq!(values[[0, 1]], 2.2);
        // Null source value and absent combination are both NaN.
        assert!(values[[1, 0]].is_nan());
        assert!(values[[1, 1]].is_nan());
    }

    #[test]
    fn test_integer_layer_is_numeric() {
        let layer = pivot_layer(
            &long_frame(),
            "SampleBlockQCFail",
            "SampleID",
            "Assay",
            DuplicatePolicy::Reject,
        )
        .unwrap();
        assert_eq!(layer.as_numeric().unwrap()[[0, 1]], 1.0);
    }

    #[test]
    fn test_text_layer_is_categorical() {
        let layer = pivot_layer(
            &long_frame(),
            "WellID",
            "SampleID",
            "Assay",
            DuplicatePolicy::Reject,
        )
        .unwrap();
        assert!(!layer.is_numeric());
        let values = layer.as_categorical().unwrap();
        assert_eq!(values[[1, 0]].as_deref(), Some("B1"));
        assert_eq!(values[[1, 1]], None);
    }

    #[test]
    fn test_reordered() {
        let layer = pivot_layer(
            &long_frame(),
            "NPX",
            "SampleID",
            "Assay",
            DuplicatePolicy::Reject,
        )
        .unwrap();
        let rows = vec!["S2".to_string(), "S1".to_string()];
        let columns = vec!["A2".to_string(), "A1".to_string()];
        let reordered = layer.reordered(&rows, &columns).unwrap();
        let values = reordered.as_numeric().unwrap();
        assert_eq!(values[[1, 0]], 2.2);
        assert_eq!(values[[1, 1]], 1.1);
        assert!(layer.reordered(&rows[..1], &columns).is_none());
        let unknown = vec!["S1".to_string(), "S9".to_string()];
        assert!(layer.reordered(&unknown, &columns).is_none());
    }

    #[test]
    fn test_null_identifier() {
        let df = DataFrame::new(vec![
            Series::new("SampleID".into(), vec![Some("S1"), None]).into(),
            Series::new("Assay".into(), vec!["A1", "A1"]).into(),
            Series::new("NPX".into(), vec![1.0f64, 2.0]).into(),
        ])
        .unwrap();
        let err = pivot_layer(&df, "NPX", "SampleID", "Assay", DuplicatePolicy::Reject)
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::NullIdentifier { ref column, row: 1 } if column == "SampleID"
        ));
    }
}
