//! Exporter stage: serialize a table into a downloadable artifact

mod csv;
mod xlsx;

use std::io::Cursor;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{SweepError, SweepResult};
use crate::model::Table;

pub use self::csv::CsvWriter;
pub use self::xlsx::{XlsxWriter, SHEET_NAME};

/// Target format of a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    /// Extension of produced files, with its leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Excel => ".xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Excel => write!(f, "Excel"),
        }
    }
}

/// Bytes ready for download
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub format: ExportFormat,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl ExportArtifact {
    /// Reader positioned at the start of the content
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Trait for table serializers
pub trait TableWriter {
    /// Serialize the whole table, header row first, without an index column
    fn write(&self, table: &Table) -> anyhow::Result<Vec<u8>>;
}

/// Factory for creating table writers
pub struct WriterFactory;

impl WriterFactory {
    pub fn create(format: ExportFormat) -> Box<dyn TableWriter> {
        match format {
            ExportFormat::Csv => Box::new(CsvWriter),
            ExportFormat::Excel => Box::new(XlsxWriter),
        }
    }
}

/// `source` without its final extension
pub fn file_stem(source: &str) -> &str {
    match Path::new(source).extension() {
        Some(ext) => &source[..source.len() - ext.len() - 1],
        None => source,
    }
}

/// `source` with its final extension replaced by the one of `format`
pub fn output_file_name(source: &str, format: ExportFormat) -> String {
    format!("{}{}", file_stem(source), format.extension())
}

/// Serialize `table` for download under a name derived from `source_name`
pub fn export(table: &Table, source_name: &str, format: ExportFormat) -> SweepResult<ExportArtifact> {
    let data = WriterFactory::create(format)
        .write(table)
        .map_err(|e| SweepError::export(source_name, format!("{:#}", e)))?;

    let artifact = ExportArtifact {
        file_name: output_file_name(source_name, format),
        mime_type: format.mime_type(),
        format,
        data,
    };

    info!(
        file = %source_name,
        output = %artifact.file_name,
        bytes = artifact.len(),
        "exported table"
    );
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("report.xlsx", ExportFormat::Csv), "report.csv");
        assert_eq!(output_file_name("data.csv", ExportFormat::Excel), "data.xlsx");
        assert_eq!(output_file_name("Data.CSV", ExportFormat::Csv), "Data.csv");
        assert_eq!(output_file_name("my.data.csv", ExportFormat::Excel), "my.data.xlsx");
        assert_eq!(output_file_name("csv.csv", ExportFormat::Excel), "csv.xlsx");
        assert_eq!(output_file_name("README", ExportFormat::Csv), "README.csv");
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(
            ExportFormat::Excel.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }
}
