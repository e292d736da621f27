//! Output formatting for sweep reports

mod json;
mod terminal;

use std::io::IsTerminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::OutputFormat;
use crate::pipeline::SweepReport;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a sweep report to a writer
    fn render(&self, report: &SweepReport, writer: &mut dyn WriteColor) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a sweep report to stdout
pub fn render_to_stdout(report: &SweepReport, format: OutputFormat) -> Result<()> {
    let color = match format {
        OutputFormat::Terminal if std::io::stdout().is_terminal() => ColorChoice::Auto,
        _ => ColorChoice::Never,
    };
    let formatter = OutputFactory::create(format);
    let mut stdout = StandardStream::stdout(color);
    formatter.render(report, &mut stdout)
}
