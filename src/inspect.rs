//! Inspector stage: file metadata and a preview of the leading rows

use serde::Serialize;

use crate::model::Table;

/// Rows shown in a preview unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Metadata about an uploaded file and the table read from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size_bytes: usize,
    pub rows: usize,
    pub columns: usize,
}

impl FileInfo {
    pub fn from_parts(name: &str, size_bytes: usize, table: &Table) -> Self {
        Self {
            name: name.to_string(),
            size_bytes,
            rows: table.row_count(),
            columns: table.column_count(),
        }
    }

    /// Size in kibibytes
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// First `rows` rows of `table`
pub fn preview(table: &Table, rows: usize) -> Table {
    table.head(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn test_size_kib() {
        let table = Table::new(vec![Column::new("x", 0)]);
        let info = FileInfo::from_parts("data.csv", 1536, &table);
        assert_eq!(info.size_kib(), 1.5);
        assert_eq!(info.size_bytes, 1536);
    }

    #[test]
    fn test_preview_does_not_touch_table() {
        let mut table = Table::new(vec![Column::new("n", 0)]);
        for i in 0..8 {
            table.add_row(vec![CellValue::Int(i)], i as usize + 2);
        }
        let head = preview(&table, DEFAULT_PREVIEW_ROWS);
        assert_eq!(head.row_count(), 5);
        assert_eq!(table.row_count(), 8);
    }
}
