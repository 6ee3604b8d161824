//! The assembled annotated container.

use std::collections::BTreeMap;

use ndarray::Array2;
use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult, Series};
use tau_model::FieldValue;

use crate::error::{ConvertError, LayerAxis, Result};
use crate::pivot::LayerMatrix;

/// An indexed per-sample (`obs`) or per-assay (`var`) table.
///
/// The index column is held apart from `data` and its values are unique.
#[derive(Debug, Clone)]
pub struct Descriptor {
    index_name: String,
    index: Vec<String>,
    data: DataFrame,
}

impl Descriptor {
    pub(crate) fn new(index_name: String, index: Vec<String>, data: DataFrame) -> Self {
        Self {
            index_name,
            index,
            data,
        }
    }

    /// Name of the identifier column the table is keyed by.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Non-index columns, one row per index entry.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The table with the index restored as its first column.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let index = Series::new(self.index_name.as_str().into(), self.index.clone());
        let mut columns: Vec<Column> = vec![index.into()];
        columns.extend(self.data.get_columns().iter().cloned());
        DataFrame::new(columns)
    }
}

/// Run-level metadata: every value of each dataset column, in row order.
pub type DatasetMetadata = BTreeMap<String, Vec<FieldValue>>;

/// Primary matrix, descriptors, dataset metadata and layers of one conversion.
///
/// Every layer's rows equal the `obs` index and its columns equal the `var`
/// index, in the same order.
#[derive(Debug, Clone)]
pub struct AnnotatedContainer {
    primary: String,
    x: Array2<f64>,
    obs: Descriptor,
    var: Descriptor,
    uns: DatasetMetadata,
    layers: Vec<LayerMatrix>,
}

impl AnnotatedContainer {
    /// Assemble a container, checking every layer against the descriptors.
    ///
    /// `primary` names the layer promoted to `X`; it must be present and
    /// numeric.
    pub fn new(
        primary: &str,
        obs: Descriptor,
        var: Descriptor,
        uns: DatasetMetadata,
        layers: Vec<LayerMatrix>,
    ) -> Result<Self> {
        for layer in &layers {
            check_axis(layer, LayerAxis::Obs, &layer.rows, obs.index())?;
            check_axis(layer, LayerAxis::Var, &layer.columns, var.index())?;
        }
        let selected = layers
            .iter()
            .find(|layer| layer.key == primary)
            .ok_or_else(|| ConvertError::missing(primary))?;
        let x = selected
            .as_numeric()
            .ok_or_else(|| ConvertError::NonNumericLayer {
                layer: primary.to_string(),
            })?
            .clone();
        Ok(Self {
            primary: primary.to_string(),
            x,
            obs,
            var,
            uns,
            layers,
        })
    }

    /// Key of the layer promoted to `X`.
    pub fn primary_key(&self) -> &str {
        &self.primary
    }

    /// The primary matrix: samples by assays.
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn obs(&self) -> &Descriptor {
        &self.obs
    }

    pub fn var(&self) -> &Descriptor {
        &self.var
    }

    pub fn uns(&self) -> &DatasetMetadata {
        &self.uns
    }

    /// All layers, the primary included, in classification order.
    pub fn layers(&self) -> &[LayerMatrix] {
        &self.layers
    }

    pub fn layer(&self, key: &str) -> Option<&LayerMatrix> {
        self.layers.iter().find(|layer| layer.key == key)
    }

    pub fn layer_keys(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.key.as_str()).collect()
    }

    /// (samples, assays).
    pub fn shape(&self) -> (usize, usize) {
        (self.obs.len(), self.var.len())
    }
}

fn check_axis(
    layer: &LayerMatrix,
    axis: LayerAxis,
    labels: &[String],
    index: &[String],
) -> Result<()> {
    if labels == index {
        return Ok(());
    }
    Err(axis_mismatch(&layer.key, axis, labels, index))
}

/// Describe how `labels` differs from `index` as a mismatch error.
///
/// When both hold the same set in a different order, `missing` and
/// `unexpected` are empty.
pub(crate) fn axis_mismatch(
    layer: &str,
    axis: LayerAxis,
    labels: &[String],
    index: &[String],
) -> ConvertError {
    let missing = index
        .iter()
        .filter(|label| !labels.contains(label))
        .cloned()
        .collect();
    let unexpected = labels
        .iter()
        .filter(|label| !index.contains(label))
        .cloned()
        .collect();
    ConvertError::AxisMismatch {
        layer: layer.to_string(),
        axis,
        missing,
        unexpected,
    }
}
