//! datasweeper - Clean, preview and convert tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;

use datasweeper::clean::CleanOp;
use datasweeper::config::{Config, OutputFormat};
use datasweeper::export::ExportFormat;
use datasweeper::logging;
use datasweeper::output::render_to_stdout;
use datasweeper::pipeline::process_paths;
use datasweeper::Session;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Csv,
    #[value(alias = "xlsx")]
    Excel,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(f: CliExportFormat) -> Self {
        match f {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Excel => ExportFormat::Excel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCleanOp {
    Dedup,
    Impute,
}

impl From<CliCleanOp> for CleanOp {
    fn from(op: CliCleanOp) -> Self {
        match op {
            CliCleanOp::Dedup => CleanOp::Dedup,
            CliCleanOp::Impute => CleanOp::Impute,
        }
    }
}

/// Clean, preview and convert tabular data files (CSV, Excel)
#[derive(Parser, Debug)]
#[command(name = "datasweeper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to process (.csv or .xlsx), in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Cleaning steps, applied in the order given (comma-separated or repeated)
    #[arg(long, value_enum, value_delimiter = ',')]
    clean: Vec<CliCleanOp>,

    /// Columns to keep, in output order (comma-separated; default: all)
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Chart the first two numeric columns
    #[arg(long)]
    chart: bool,

    /// Target format of the conversion
    #[arg(short = 't', long = "to", value_enum, default_value = "csv")]
    to: CliExportFormat,

    /// Directory receiving converted files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Do not write any file; only report
    #[arg(long)]
    no_export: bool,

    /// Rows shown in previews
    #[arg(short = 'n', long, default_value_t = 5)]
    preview_rows: usize,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(all_ok) => {
            if all_ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1) // At least one file failed
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.quiet);

    let mut config = Config::new(cli.files)
        .with_clean_ops(cli.clean.into_iter().map(CleanOp::from).collect())
        .with_chart(cli.chart)
        .with_export_format(cli.to.into())
        .with_export(!cli.no_export)
        .with_output_dir(cli.out_dir)
        .with_preview_rows(cli.preview_rows)
        .with_output_format(cli.format.into());
    if let Some(columns) = cli.columns {
        // `--columns ""` selects nothing
        config = config.with_columns(columns.into_iter().filter(|c| !c.is_empty()).collect());
    }
    debug!(?config, "starting sweep");

    if config.export {
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output_dir.display()
            )
        })?;
    }

    let mut session = Session::new();
    let report = process_paths(&mut session, &config);

    render_to_stdout(&report, config.output_format).context("Failed to write report")?;

    Ok(!report.has_failures())
}
