//! `tau`: convert and validate long-format NPX exports.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tau_cli::commands::{run_convert, run_validate};
use tau_cli::logging::{LogConfig, LogFormat, init_logging};
use tau_cli::types::{ConvertRequest, ValidateRequest};
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_convert_summary, print_default_columns, print_validate_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Convert(args) => {
            let request = ConvertRequest {
                input: args.input.clone(),
                config: args.conversion_config(),
                output_dir: args.output_dir.clone(),
                dry_run: args.dry_run,
            };
            match run_convert(&request) {
                Ok(result) => {
                    print_convert_summary(&result);
                    0
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Command::Validate(args) => {
            let request = ValidateRequest {
                input: args.input,
                level: args.level.into(),
                max_rows: args.max_rows,
            };
            match run_validate(&request) {
                Ok(result) => {
                    print_validate_summary(&result);
                    if result.has_errors() { 1 } else { 0 }
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Command::Columns => {
            print_default_columns();
            0
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
