//! Colored terminal output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::Table;
use crate::pipeline::{FileReport, Level, SweepReport};

use super::OutputFormatter;

/// Width of the longest chart bar, in characters
const CHART_WIDTH: usize = 40;

/// Human-readable report with colored messages
pub struct TerminalOutput {
    chart_width: usize,
}

impl TerminalOutput {
    pub fn new() -> Self {
        Self {
            chart_width: CHART_WIDTH,
        }
    }

    fn write_header(&self, writer: &mut dyn WriteColor, name: &str) -> Result<()> {
        writer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " {}", name)?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writer.reset()?;
        Ok(())
    }

    fn write_messages(&self, file: &FileReport, writer: &mut dyn WriteColor) -> Result<()> {
        for message in &file.messages {
            match message.level {
                Level::Info => writeln!(writer, "{}", message.text)?,
                Level::Error => {
                    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
                    writeln!(writer, "error: {}", message.text)?;
                    writer.reset()?;
                }
            }
        }
        Ok(())
    }

    fn write_preview(&self, title: &str, table: &Table, writer: &mut dyn WriteColor) -> Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{} ({} rows):", title, table.row_count())?;
        write!(writer, "{}", build_table(table))?;
        Ok(())
    }

    fn write_file(&self, file: &FileReport, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_header(writer, &file.name)?;
        self.write_messages(file, writer)?;

        if let Some(ref info) = file.info {
            writeln!(writer, "Rows: {}  Columns: {}", info.rows, info.columns)?;
        }
        if let Some(ref preview) = file.preview {
            self.write_preview("Preview", preview, writer)?;
        }
        if let Some(ref preview) = file.cleaned_preview {
            self.write_preview("Cleaned preview", preview, writer)?;
        }
        if file.info.is_some() {
            writeln!(writer)?;
            writeln!(writer, "Selected columns: {}", file.columns.join(", "))?;
        }
        if let Some(ref chart) = file.chart {
            writeln!(writer)?;
            writeln!(writer, "Chart:")?;
            let mut bars = Vec::new();
            chart.write_text(&mut bars, self.chart_width)?;
            writer.write_all(&bars)?;
        }
        if let Some(ref artifact) = file.artifact {
            writeln!(
                writer,
                "Download: {} ({}, {} bytes)",
                artifact.file_name,
                artifact.mime_type,
                artifact.len()
            )?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_summary(&self, report: &SweepReport, writer: &mut dyn WriteColor) -> Result<()> {
        let failed = report.failed_count();
        if failed == 0 {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            writeln!(writer, "All files converted ({})", report.files.len())?;
        } else {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
            writeln!(
                writer,
                "{} of {} files could not be converted",
                failed,
                report.files.len()
            )?;
        }
        writer.reset()?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, report: &SweepReport, writer: &mut dyn WriteColor) -> Result<()> {
        if report.files.is_empty() {
            writeln!(writer, "No files to process.")?;
            return Ok(());
        }

        for file in &report.files {
            self.write_file(file, writer)?;
        }
        self.write_summary(report, writer)?;
        Ok(())
    }
}

/// Box-drawn rendering of a table, header first
fn build_table(table: &Table) -> String {
    if table.column_count() == 0 {
        return "(no columns)\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.clone()));
    for row in &table.rows {
        builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
    }

    let mut rendered = builder.build();
    rendered.with(Style::modern());
    format!("{}\n", rendered)
}
