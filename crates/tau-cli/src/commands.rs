use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use tau_ingest::{read_table, read_table_with_text_columns};
use tau_output::{WriteOptions, write_container};
use tau_transform::{
    AnnotatedContainer, DEFAULT_DATASET_COLUMNS, DEFAULT_LAYER_COLUMNS,
    DEFAULT_OBSERVATION_COLUMNS, DEFAULT_VARIABLE_COLUMNS, LayerMatrix, LayerValues, convert,
};
use tau_validate::{RecordSchema, validate_table};

use crate::types::{
    ConvertRequest, ConvertResult, LayerSummary, ValidateRequest, ValidateResult,
};

/// Read, convert and (unless a dry run) write one source table.
pub fn run_convert(request: &ConvertRequest) -> Result<ConvertResult> {
    let input = &request.input;
    let span = info_span!("run_convert", input = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let df = read_table(input).with_context(|| format!("read {}", input.display()))?;
    let container =
        convert(&df, &request.config).with_context(|| format!("convert {}", input.display()))?;

    let mut result = summarize(&container, input, df.height());
    if !request.dry_run {
        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(input));
        let options = WriteOptions::default().with_source(input);
        let written = write_container(&container, &output_dir, &options)?;
        result.files = written.files;
        result.output_dir = Some(output_dir);
    }
    info!(
        dry_run = request.dry_run,
        duration_ms = start.elapsed().as_millis(),
        "convert finished"
    );
    Ok(result)
}

/// Validate every row (or the first `max_rows`) of a source table.
pub fn run_validate(request: &ValidateRequest) -> Result<ValidateResult> {
    let input = &request.input;
    let schema = RecordSchema::for_level(request.level);
    let df = read_table_with_text_columns(input, &schema.text_fields())
        .with_context(|| format!("read {}", input.display()))?;
    let total_rows = df.height();
    let df = match request.max_rows {
        Some(limit) => df.head(Some(limit)),
        None => df,
    };
    let report = validate_table(&df, &schema)
        .with_context(|| format!("validate {}", input.display()))?;
    info!(
        input = %input.display(),
        level = %request.level,
        rows = report.rows_checked,
        invalid = report.invalid_rows(),
        "validation finished"
    );
    Ok(ValidateResult {
        input: input.clone(),
        total_rows,
        report,
    })
}

/// Default destination lists with their distinct names, in list order.
pub fn default_columns() -> Vec<(&'static str, Vec<&'static str>)> {
    [
        ("var", DEFAULT_VARIABLE_COLUMNS),
        ("obs", DEFAULT_OBSERVATION_COLUMNS),
        ("uns", DEFAULT_DATASET_COLUMNS),
        ("layers", DEFAULT_LAYER_COLUMNS),
    ]
    .into_iter()
    .map(|(destination, names)| {
        let mut distinct: Vec<&'static str> = Vec::with_capacity(names.len());
        for name in names {
            if !distinct.contains(name) {
                distinct.push(*name);
            }
        }
        (destination, distinct)
    })
    .collect()
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    input.with_file_name(format!("{stem}_container"))
}

fn summarize(container: &AnnotatedContainer, input: &Path, input_rows: usize) -> ConvertResult {
    let (n_obs, n_vars) = container.shape();
    ConvertResult {
        input: input.to_path_buf(),
        input_rows,
        primary: container.primary_key().to_string(),
        n_obs,
        n_vars,
        layers: container.layers().iter().map(layer_summary).collect(),
        uns_keys: container.uns().keys().cloned().collect(),
        output_dir: None,
        files: Vec::new(),
    }
}

fn layer_summary(layer: &LayerMatrix) -> LayerSummary {
    let (rows, columns) = layer.shape();
    let filled = match &layer.values {
        LayerValues::Numeric(values) => values.iter().filter(|value| !value.is_nan()).count(),
        LayerValues::Categorical(values) => values.iter().filter(|value| value.is_some()).count(),
    };
    LayerSummary {
        key: layer.key.clone(),
        numeric: layer.is_numeric(),
        filled,
        missing: rows * columns - filled,
    }
}
