//! Excel workbook serialization

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use crate::model::{CellValue, Table};

use super::TableWriter;

/// Name of the single worksheet written
pub const SHEET_NAME: &str = "Sheet1";

/// Writes a one-sheet workbook with a bold header row.
///
/// Numbers and booleans keep their cell types; dates and text are written as
/// strings and missing cells are left blank.
pub struct XlsxWriter;

impl TableWriter for XlsxWriter {
    fn write(&self, table: &Table) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(SHEET_NAME)?;

            for (col_idx, column) in table.columns.iter().enumerate() {
                let col = u16::try_from(col_idx).context("Too many columns for a worksheet")?;
                worksheet.write_string_with_format(0, col, &column.name, &header)?;
            }

            for (row_idx, row) in table.rows.iter().enumerate() {
                let xl_row = u32::try_from(row_idx + 1).context("Too many rows for a worksheet")?;

                for (col_idx, cell) in row.cells.iter().enumerate() {
                    let col = u16::try_from(col_idx).context("Too many columns for a worksheet")?;
                    match cell {
                        CellValue::Null => {}
                        CellValue::Float(f) if f.is_nan() => {}
                        CellValue::Int(i) => {
                            worksheet.write_number(xl_row, col, *i as f64)?;
                        }
                        CellValue::Float(f) => {
                            worksheet.write_number(xl_row, col, *f)?;
                        }
                        CellValue::Bool(b) => {
                            worksheet.write_boolean(xl_row, col, *b)?;
                        }
                        other => {
                            worksheet.write_string(xl_row, col, other.display().as_ref())?;
                        }
                    }
                }
            }
        }

        workbook
            .save_to_buffer()
            .context("Failed to build workbook")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    #[test]
    fn test_writes_zip_container() {
        let mut table = Table::new(vec![Column::new("id", 0), Column::new("name", 1)]);
        table.add_row(vec![1i64.into(), "a".into()], 2);

        let bytes = XlsxWriter.write(&table).unwrap();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
