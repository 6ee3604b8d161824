//! Source table readers.
//!
//! The format is chosen from the file extension. Parquet is the native NPX
//! export format; delimited text is accepted for hand-edited or legacy files.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Rows sampled for schema inference when reading delimited text.
pub const INFER_SCHEMA_ROWS: usize = 1000;

/// Supported on-disk table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Parquet,
    Csv,
    Tsv,
}

impl TableFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "parquet" | "pq" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            "tsv" | "txt" => Some(Self::Tsv),
            _ => None,
        }
    }
}

/// Read a source table, dispatching on the file extension.
///
/// The returned frame has at least one row and no blank column names.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let df = match detect_format(path)? {
        TableFormat::Parquet => read_parquet_table(path)?,
        TableFormat::Csv => read_delimited_table(path, b',')?,
        TableFormat::Tsv => read_delimited_table(path, b'\t')?,
    };
    finish_load(df, path)
}

/// Read a source table keeping `text_columns` as text.
///
/// Delimited input is read without type inference, so every cell keeps its
/// exact source text (`Block` = `01` stays `"01"`). Parquet columns named in
/// `text_columns` that are stored with a non-string dtype are cast to
/// strings; other columns keep their stored types.
pub fn read_table_with_text_columns(path: &Path, text_columns: &[&str]) -> Result<DataFrame> {
    let df = match detect_format(path)? {
        TableFormat::Parquet => {
            let mut df = read_parquet_table(path)?;
            for name in text_columns {
                let Ok(column) = df.column(name) else {
                    continue;
                };
                if column.dtype() != &DataType::String {
                    let text = column.cast(&DataType::String)?;
                    df.with_column(text)?;
                }
            }
            df
        }
        TableFormat::Csv => read_delimited(path, b',', Some(0))?,
        TableFormat::Tsv => read_delimited(path, b'\t', Some(0))?,
    };
    finish_load(df, path)
}

fn detect_format(path: &Path) -> Result<TableFormat> {
    TableFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

fn finish_load(df: DataFrame, path: &Path) -> Result<DataFrame> {
    validate_dataframe_shape(&df, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "table loaded"
    );
    Ok(df)
}

/// Read a Parquet file into a DataFrame.
pub fn read_parquet_table(path: &Path) -> Result<DataFrame> {
    let file = open_file(path)?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::ParquetParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Read a delimited text file with a single header row.
pub fn read_delimited_table(path: &Path, separator: u8) -> Result<DataFrame> {
    read_delimited(path, separator, Some(INFER_SCHEMA_ROWS))
}

/// `infer_rows` of `Some(0)` reads every column as strings.
fn read_delimited(path: &Path, separator: u8, infer_rows: Option<usize>) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_rows)
        .map_parse_options(|opts| opts.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Validate DataFrame shape after loading.
///
/// Rejects tables without rows or with blank column names, and warns about
/// unusually wide tables (a long-format export has a few dozen columns).
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    if df.width() > 500 {
        tracing::warn!(
            path = %path.display(),
            columns = df.width(),
            "table has more than 500 columns - is it already in wide format?"
        );
    }

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}
