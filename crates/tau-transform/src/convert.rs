//! Conversion of a long-format table into an [`AnnotatedContainer`].

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tau_ingest::{column_field_values, column_labels, column_names};
use tracing::{debug, info, info_span, warn};

use crate::classify::classify_columns;
use crate::config::ConversionConfig;
use crate::container::{AnnotatedContainer, DatasetMetadata, Descriptor, axis_mismatch};
use crate::error::{ConvertError, LayerAxis, Result};
use crate::pivot::{LayerMatrix, pivot_layer};

/// Reshape `df` into an annotated container.
///
/// Either a complete, axis-consistent container is returned or an error;
/// nothing is produced partially.
pub fn convert(df: &DataFrame, config: &ConversionConfig) -> Result<AnnotatedContainer> {
    let span = info_span!(
        "convert",
        primary = %config.matrix_selector_column,
        sample_column = %config.sample_identifier_column,
        input_rows = df.height()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let plan = classify_columns(&column_names(df), config)?;
    debug!(
        variable = ?plan.variable,
        observation = ?plan.observation,
        dataset = ?plan.dataset,
        layer = ?plan.layer,
        "columns classified"
    );

    let var = build_descriptor(df, &plan.variable, &config.assay_identifier_column)?;
    let obs = build_descriptor(df, &plan.observation, &config.sample_identifier_column)?;

    let mut uns = DatasetMetadata::new();
    for key in &plan.dataset {
        uns.insert(key.clone(), column_field_values(df, key)?);
    }

    let mut layers = Vec::with_capacity(plan.layer.len());
    for key in &plan.layer {
        let layer = pivot_layer(
            df,
            key,
            &config.sample_identifier_column,
            &config.assay_identifier_column,
            config.duplicate_policy,
        )?;
        debug!(
            layer = %key,
            rows = layer.rows.len(),
            columns = layer.columns.len(),
            numeric = layer.is_numeric(),
            "layer pivoted"
        );
        layers.push(align_layer(layer, &obs, &var)?);
    }

    let container =
        AnnotatedContainer::new(&config.matrix_selector_column, obs, var, uns, layers)?;
    let (n_obs, n_vars) = container.shape();
    info!(
        n_obs,
        n_vars,
        layers = container.layers().len(),
        uns_keys = container.uns().len(),
        duration_ms = start.elapsed().as_millis(),
        "conversion complete"
    );
    Ok(container)
}

/// Check a layer's label sets against the descriptors and adopt their order.
fn align_layer(layer: LayerMatrix, obs: &Descriptor, var: &Descriptor) -> Result<LayerMatrix> {
    if layer.rows == obs.index() && layer.columns == var.index() {
        return Ok(layer);
    }
    if let Some(aligned) = layer.reordered(obs.index(), var.index()) {
        return Ok(aligned);
    }
    if layer.reordered(obs.index(), &layer.columns).is_none() {
        return Err(axis_mismatch(
            &layer.key,
            LayerAxis::Obs,
            &layer.rows,
            obs.index(),
        ));
    }
    Err(axis_mismatch(
        &layer.key,
        LayerAxis::Var,
        &layer.columns,
        var.index(),
    ))
}

/// Select `columns`, drop repeated rows and key the result by `index_column`.
///
/// Exact duplicate rows collapse silently. A later row that repeats a key
/// with different values is dropped with a warning; the first row wins.
fn build_descriptor(df: &DataFrame, columns: &[String], index_column: &str) -> Result<Descriptor> {
    let selected = df.select(columns.iter().map(String::as_str))?;
    let keys = column_labels(&selected, index_column)?;

    let mut cells = Vec::with_capacity(columns.len());
    for name in columns {
        cells.push(column_labels(&selected, name)?);
    }

    let mut first_rows: HashMap<&str, usize> = HashMap::new();
    let mut index = Vec::new();
    let mut keep = Vec::with_capacity(keys.len());
    let mut conflicts: BTreeMap<&str, usize> = BTreeMap::new();
    for (row, key) in keys.iter().enumerate() {
        let key = key.as_deref().ok_or_else(|| ConvertError::NullIdentifier {
            column: index_column.to_string(),
            row,
        })?;
        match first_rows.get(key).copied() {
            None => {
                first_rows.insert(key, row);
                index.push(key.to_string());
                keep.push(true);
            }
            Some(first) => {
                if cells.iter().any(|column| column[first] != column[row]) {
                    *conflicts.entry(key).or_default() += 1;
                }
                keep.push(false);
            }
        }
    }
    if !conflicts.is_empty() {
        warn!(
            index = %index_column,
            keys = conflicts.len(),
            dropped_rows = conflicts.values().sum::<usize>(),
            first_key = conflicts.keys().next().copied().unwrap_or_default(),
            "conflicting rows share a key; keeping the first row per key"
        );
    }

    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    let data = selected.filter(&mask)?.drop(index_column)?;
    Ok(Descriptor::new(index_column.to_string(), index, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_descriptor_first_row_wins() {
        let df = DataFrame::new(vec![
            Series::new("Assay".into(), vec!["IL6", "TNF", "IL6", "IL6"]).into(),
            Series::new("Panel".into(), vec!["Inflam", "Inflam", "Inflam", "Onc"]).into(),
        ])
        .unwrap();
        let var =
            build_descriptor(&df, &["Assay".to_string(), "Panel".to_string()], "Assay").unwrap();
        assert_eq!(var.index().to_vec(), vec!["IL6", "TNF"]);
        assert_eq!(var.data().height(), 2);
        assert_eq!(column_names(var.data()), vec!["Panel"]);
        assert_eq!(
            column_labels(var.data(), "Panel").unwrap(),
            vec![Some("Inflam".to_string()), Some("Inflam".to_string())]
        );
    }

    #[test]
    fn test_descriptor_null_key() {
        let df = DataFrame::new(vec![
            Series::new("SampleID".into(), vec![Some("S1"), None]).into(),
        ])
        .unwrap();
        let err = build_descriptor(&df, &["SampleID".to_string()], "SampleID").unwrap_err();
        assert!(matches!(err, ConvertError::NullIdentifier { row: 1, .. }));
    }
}
