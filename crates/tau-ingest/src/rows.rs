//! Row and column access over a long-format source table.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use tau_model::FieldValue;

use crate::polars_utils::{any_to_field_value, any_to_label};

/// Names of the table's columns, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Extract one row as a field-name → value record.
pub fn row_record(df: &DataFrame, idx: usize) -> PolarsResult<BTreeMap<String, FieldValue>> {
    let mut record = BTreeMap::new();
    for column in df.get_columns() {
        let value = column.get(idx)?;
        record.insert(column.name().to_string(), any_to_field_value(value));
    }
    Ok(record)
}

/// Every value of a column as [`FieldValue`]s, nulls included.
pub fn column_field_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<FieldValue>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_field_value(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Every value of a column as an axis label, `None` where the cell is null.
pub fn column_labels(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut labels = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        labels.push(any_to_label(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(labels)
}
