//! Loader stage: turns uploaded bytes into a [`Table`]

mod csv;
mod excel;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{SweepError, SweepResult};
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;

/// A file handed to the tool by the user
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Where the content was read from, for uploads taken from disk
    pub path: Option<PathBuf>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Lower-cased extension with its leading dot, or `""` when there is none
    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }

    /// Size of the content in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Lower-cased extension of `name` with its leading dot (`"Report.XLSX"` → `".xlsx"`)
pub fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Trait for parsing tabular data from raw bytes
pub trait Parser: Send + Sync {
    /// Parse file content and return a Table
    fn parse(&self, bytes: &[u8]) -> SweepResult<Table>;

    /// Check if this parser can handle the given extension (lower-cased, no dot)
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Dispatches uploads to a parser by file extension
pub struct Loader {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Create a loader with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(ExcelParser)],
        }
    }

    /// Get a parser for the given file name
    pub fn get_parser(&self, name: &str) -> SweepResult<&dyn Parser> {
        let ext = file_extension(name);
        let bare = ext.trim_start_matches('.');

        self.parsers
            .iter()
            .find(|p| p.supports_extension(bare))
            .map(|p| p.as_ref())
            .ok_or(SweepError::UnsupportedFormat { extension: ext })
    }

    /// Parse an upload, rejecting unsupported types and tables without data
    pub fn load(&self, file: &UploadedFile) -> SweepResult<Table> {
        let parser = self.get_parser(&file.name)?;
        let table = parser.parse(&file.bytes)?;

        if table.is_empty() {
            return Err(SweepError::EmptyOrUnreadable {
                file: file.name.clone(),
            });
        }

        debug!(
            file = %file.name,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("data.csv"), ".csv");
        assert_eq!(file_extension("Report.XLSX"), ".xlsx");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".csv"), "");
    }

    #[test]
    fn test_unsupported_extension() {
        let loader = Loader::new();
        let err = loader
            .load(&UploadedFile::new("notes.txt", "a,b\n1,2\n"))
            .unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedFormat { .. }));
        assert_eq!(err.to_string(), "Unsupported file type: .txt");
    }

    #[test]
    fn test_header_only_csv_is_empty() {
        let loader = Loader::new();
        let err = loader
            .load(&UploadedFile::new("data.csv", "id,name\n"))
            .unwrap_err();
        assert!(matches!(err, SweepError::EmptyOrUnreadable { .. }));
    }

    #[test]
    fn test_zero_byte_csv_is_empty() {
        let loader = Loader::new();
        let err = loader.load(&UploadedFile::new("data.csv", "")).unwrap_err();
        assert!(matches!(err, SweepError::EmptyOrUnreadable { .. }));
    }

    #[test]
    fn test_uppercase_extension_dispatches() {
        let loader = Loader::new();
        let table = loader
            .load(&UploadedFile::new("DATA.CSV", "a\n1\n"))
            .unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_garbage_xlsx_is_parse_failure() {
        let loader = Loader::new();
        let err = loader
            .load(&UploadedFile::new("report.xlsx", "not a zip"))
            .unwrap_err();
        assert!(matches!(err, SweepError::ParseFailure { format: "Excel", .. }));
        assert!(err.to_string().starts_with("Error reading Excel file: "));
    }
}
