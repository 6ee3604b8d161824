//! CLI argument definitions for `tau`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tau_model::FormatLevel;
use tau_transform::{ConversionConfig, DuplicatePolicy};

#[derive(Parser)]
#[command(
    name = "tau",
    version,
    about = "Reshape long-format NPX exports into annotated containers",
    long_about = "Reshape long-format NPX exports (one row per sample and assay) into an\n\
                  annotated container: primary matrix, obs, var, uns and layers.\n\n\
                  Also validates export rows against the L1 and L2 record schemas."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a source table into a container directory.
    Convert(ConvertArgs),

    /// Validate every row of a source table against a record schema.
    Validate(ValidateArgs),

    /// List the default destination of each known column.
    Columns,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Source table (.parquet, .csv or .tsv).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Layer promoted to the primary matrix X.
    #[arg(long = "x-col", default_value = "NPX")]
    pub x_col: String,

    /// Column identifying samples (obs index).
    #[arg(long = "sample-id-col", default_value = "SampleID")]
    pub sample_id_col: String,

    /// Column identifying assays (var index).
    #[arg(long = "assay-id-col", default_value = "Assay")]
    pub assay_id_col: String,

    /// Extra per-sample columns for obs (repeatable or comma-separated).
    #[arg(long = "extra-obs", value_name = "NAME", value_delimiter = ',')]
    pub extra_obs: Vec<String>,

    /// Extra per-assay columns for var (repeatable or comma-separated).
    #[arg(long = "extra-var", value_name = "NAME", value_delimiter = ',')]
    pub extra_var: Vec<String>,

    /// Extra run-level columns for uns (repeatable or comma-separated).
    #[arg(long = "extra-uns", value_name = "NAME", value_delimiter = ',')]
    pub extra_uns: Vec<String>,

    /// Extra columns to pivot into layers (repeatable or comma-separated).
    #[arg(long = "extra-layer", value_name = "NAME", value_delimiter = ',')]
    pub extra_layer: Vec<String>,

    /// How to treat a sample and assay pair that occurs more than once.
    #[arg(long = "duplicates", value_enum, default_value = "reject")]
    pub duplicates: DuplicatesArg,

    /// Output directory (default: <INPUT stem>_container next to the input).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Convert and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl ConvertArgs {
    pub fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig::new(&self.x_col, &self.sample_id_col)
            .with_assay_identifier(&self.assay_id_col)
            .with_extra_observation_columns(&self.extra_obs)
            .with_extra_variable_columns(&self.extra_var)
            .with_extra_dataset_columns(&self.extra_uns)
            .with_extra_layer_columns(&self.extra_layer)
            .with_duplicate_policy(self.duplicates.into())
    }
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Source table (.parquet, .csv or .tsv).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Record format level to validate against.
    #[arg(long = "level", value_enum, default_value = "l1")]
    pub level: LevelArg,

    /// Validate only the first N rows.
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicatesArg {
    Reject,
    First,
    Last,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(arg: DuplicatesArg) -> Self {
        match arg {
            DuplicatesArg::Reject => DuplicatePolicy::Reject,
            DuplicatesArg::First => DuplicatePolicy::KeepFirst,
            DuplicatesArg::Last => DuplicatePolicy::KeepLast,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    L1,
    L2,
}

impl From<LevelArg> for FormatLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::L1 => FormatLevel::L1,
            LevelArg::L2 => FormatLevel::L2,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
