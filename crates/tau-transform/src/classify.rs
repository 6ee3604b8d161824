//! Routing of source columns to container destinations.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{
    ConversionConfig, DEFAULT_DATASET_COLUMNS, DEFAULT_LAYER_COLUMNS, DEFAULT_OBSERVATION_COLUMNS,
    DEFAULT_VARIABLE_COLUMNS,
};
use crate::error::{ConvertError, Result};

/// Present columns assigned to each destination.
///
/// A column may appear in more than one destination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnPlan {
    /// `var` columns, in table order. Includes the assay identifier.
    pub variable: Vec<String>,
    /// `obs` columns, in table order. Includes the sample identifier.
    pub observation: Vec<String>,
    /// `uns` keys, in list order.
    pub dataset: Vec<String>,
    /// Layer keys, in list order.
    pub layer: Vec<String>,
}

/// Classify the columns of a table.
///
/// Each default list is extended with the configured extras and then
/// intersected with `present`. Names absent from the table are dropped
/// silently. The selector, sample identifier and assay identifier columns
/// must all be present.
pub fn classify_columns(present: &[String], config: &ConversionConfig) -> Result<ColumnPlan> {
    for required in [
        &config.matrix_selector_column,
        &config.sample_identifier_column,
        &config.assay_identifier_column,
    ] {
        if !present.iter().any(|name| name == required) {
            return Err(ConvertError::missing(required));
        }
    }

    let variable = in_table_order(
        present,
        DEFAULT_VARIABLE_COLUMNS,
        &config.extra_variable_columns,
        &config.assay_identifier_column,
    );
    let observation = in_table_order(
        present,
        DEFAULT_OBSERVATION_COLUMNS,
        &config.extra_observation_columns,
        &config.sample_identifier_column,
    );
    let dataset = in_list_order(present, DEFAULT_DATASET_COLUMNS, &config.extra_dataset_columns);
    let layer = in_list_order(present, DEFAULT_LAYER_COLUMNS, &config.extra_layer_columns);

    Ok(ColumnPlan {
        variable,
        observation,
        dataset,
        layer,
    })
}

fn in_table_order(
    present: &[String],
    defaults: &[&str],
    extras: &[String],
    forced: &str,
) -> Vec<String> {
    let wanted: BTreeSet<&str> = defaults
        .iter()
        .copied()
        .chain(extras.iter().map(String::as_str))
        .chain(std::iter::once(forced))
        .collect();
    present
        .iter()
        .filter(|name| wanted.contains(name.as_str()))
        .cloned()
        .collect()
}

fn in_list_order(present: &[String], defaults: &[&str], extras: &[String]) -> Vec<String> {
    let available: BTreeSet<&str> = present.iter().map(String::as_str).collect();
    let mut seen = BTreeSet::new();
    defaults
        .iter()
        .copied()
        .chain(extras.iter().map(String::as_str))
        .filter(|name| available.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}
