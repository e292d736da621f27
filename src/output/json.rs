//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use termcolor::WriteColor;

use crate::chart::BarChart;
use crate::clean::CleanOutcome;
use crate::export::ExportArtifact;
use crate::inspect::FileInfo;
use crate::model::{CellType, CellValue, Table};
use crate::pipeline::{Message, SweepReport};
use crate::session::Stage;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonColumn<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    cell_type: CellType,
}

#[derive(Serialize)]
struct JsonTable<'a> {
    columns: Vec<JsonColumn<'a>>,
    rows: Vec<Vec<serde_json::Value>>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    name: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<&'a FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<JsonTable<'a>>,
    cleaning: &'a [CleanOutcome],
    #[serde(skip_serializing_if = "Option::is_none")]
    cleaned_preview: Option<JsonTable<'a>>,
    columns: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<&'a BarChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<&'a ExportArtifact>,
    written: Vec<String>,
    messages: &'a [Message],
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFile<'a>>,
    failed: usize,
}

fn cell_value_to_json(value: &CellValue) -> serde_json::Value {
    match value {
        CellValue::Null => serde_json::Value::Null,
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::Int(i) => serde_json::json!(*i),
        CellValue::Float(f) => serde_json::json!(*f),
        CellValue::String(s) => serde_json::Value::String(s.to_string()),
        CellValue::Date(d) => serde_json::Value::String(d.to_string()),
        CellValue::DateTime(dt) => serde_json::Value::String(dt.to_string()),
    }
}

fn table_to_json(table: &Table) -> JsonTable<'_> {
    JsonTable {
        columns: table
            .columns
            .iter()
            .map(|c| JsonColumn {
                name: &c.name,
                cell_type: c.inferred_type,
            })
            .collect(),
        rows: table
            .rows
            .iter()
            .map(|r| r.cells.iter().map(cell_value_to_json).collect())
            .collect(),
    }
}

impl OutputFormatter for JsonOutput {
    fn render(&self, report: &SweepReport, writer: &mut dyn WriteColor) -> Result<()> {
        let files = report
            .files
            .iter()
            .map(|f| JsonFile {
                name: &f.name,
                ok: f.is_ok(),
                error: f.error.as_deref(),
                info: f.info.as_ref(),
                stage: f.stage,
                preview: f.preview.as_ref().map(table_to_json),
                cleaning: &f.outcomes,
                cleaned_preview: f.cleaned_preview.as_ref().map(table_to_json),
                columns: &f.columns,
                chart: f.chart.as_ref(),
                export: f.artifact.as_ref(),
                written: f.written.iter().map(|p| p.display().to_string()).collect(),
                messages: &f.messages,
            })
            .collect();

        let output = JsonReport {
            files,
            failed: report.failed_count(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
