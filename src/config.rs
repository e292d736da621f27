//! Configuration handling for datasweeper

use std::path::PathBuf;

use crate::clean::CleanOp;
use crate::export::ExportFormat;
use crate::inspect::DEFAULT_PREVIEW_ROWS;

/// Output format for the sweep report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

/// Configuration for a sweep over a batch of files
#[derive(Debug, Clone)]
pub struct Config {
    /// Files to process, in upload order
    pub files: Vec<PathBuf>,
    /// Cleaning steps, applied in the order given
    pub clean_ops: Vec<CleanOp>,
    /// Columns to keep; `None` keeps all of them
    pub columns: Option<Vec<String>>,
    /// Render a bar chart of the first numeric columns
    pub show_chart: bool,
    /// Target format of the conversion
    pub export_format: ExportFormat,
    /// Write exported files (and charts) to `output_dir`
    pub export: bool,
    /// Directory receiving exported files
    pub output_dir: PathBuf,
    /// Rows shown in previews
    pub preview_rows: usize,
    /// Report format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            clean_ops: Vec::new(),
            columns: None,
            show_chart: false,
            export_format: ExportFormat::default(),
            export: true,
            output_dir: PathBuf::from("."),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config for a batch of files
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    /// Set the cleaning steps
    pub fn with_clean_ops(mut self, ops: Vec<CleanOp>) -> Self {
        self.clean_ops = ops;
        self
    }

    /// Restrict output to these columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Enable the bar chart
    pub fn with_chart(mut self, show: bool) -> Self {
        self.show_chart = show;
        self
    }

    /// Set the conversion target
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    /// Enable or disable writing exported files
    pub fn with_export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set the preview length
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    /// Set the report format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}
