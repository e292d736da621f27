//! CSV serialization

use anyhow::{Context, Result};

use crate::model::Table;

use super::TableWriter;

/// Writes UTF-8 comma-separated text; missing cells become empty fields
pub struct CsvWriter;

impl TableWriter for CsvWriter {
    fn write(&self, table: &Table) -> Result<Vec<u8>> {
        // An empty record would be written as `""`, which reads back as a column
        if table.column_count() == 0 {
            return Ok(Vec::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        writer
            .write_record(table.columns.iter().map(|c| c.name.as_str()))
            .context("Failed to write CSV header")?;

        for row in &table.rows {
            writer
                .write_record(row.cells.iter().map(|c| c.display().into_owned()))
                .with_context(|| format!("Failed to write CSV row {}", row.source_line))?;
        }

        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Column};

    #[test]
    fn test_write_csv() {
        let mut table = Table::new(vec![Column::new("id", 0), Column::new("note", 1)]);
        table.add_row(vec![1i64.into(), "hello, world".into()], 2);
        table.add_row(vec![2.5f64.into(), CellValue::Null], 3);

        let bytes = CsvWriter.write(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "id,note\n1,\"hello, world\"\n2.5,\n"
        );
    }

    #[test]
    fn test_zero_column_table_writes_nothing() {
        let mut table = Table::new(vec![Column::new("id", 0)]);
        table.add_row(vec![1i64.into()], 2);
        table.add_row(vec![2i64.into()], 3);
        let projected = crate::project::project(&table, &[]);

        assert!(CsvWriter.write(&projected).unwrap().is_empty());
    }
}
