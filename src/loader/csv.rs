//! CSV file parser

use std::borrow::Cow;

use crate::error::{SweepError, SweepResult};
use crate::model::{unique_column_names, CellValue, Column, Table};

use super::Parser;

/// Tokens read as a missing value
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "n/a", "NaN", "nan", "#N/A", "None"];

/// Parser for CSV files
pub struct CsvParser;

impl Parser for CsvParser {
    fn parse(&self, bytes: &[u8]) -> SweepResult<Table> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        // Read headers
        let headers = csv_reader
            .headers()
            .map_err(|e| SweepError::parse("CSV", e))?
            .clone();

        let columns: Vec<Column> = unique_column_names(headers.iter())
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column::new(name, i))
            .collect();

        let mut table = Table::new(columns);

        // Read rows
        for (line_num, result) in csv_reader.records().enumerate() {
            let record = result.map_err(|e| {
                // +2 for 1-indexing and header
                SweepError::parse("CSV", format!("row {}: {}", line_num + 2, e))
            })?;

            let cells: Vec<CellValue> = record.iter().map(parse_cell_value).collect();
            table.add_row(cells, line_num + 2);
        }

        table.infer_column_types();
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("csv")
    }
}

/// Parse a string value into a CellValue with type inference
pub(crate) fn parse_cell_value(s: &str) -> CellValue {
    let trimmed = s.trim();

    // Check for empty/null
    if NULL_TOKENS.iter().any(|t| *t == trimmed) || trimmed.eq_ignore_ascii_case("null") {
        return CellValue::Null;
    }

    // Try parsing as boolean
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }

    // Try parsing as integer
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }

    // Try parsing as float; `inf` and friends stay text
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }

    // Try parsing as date
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return CellValue::Date(date);
    }

    // Try parsing as datetime (ISO 8601)
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return CellValue::DateTime(dt);
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return CellValue::DateTime(dt);
    }

    // Default to string
    CellValue::String(Cow::Owned(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellType;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(""), CellValue::Null);
        assert_eq!(parse_cell_value("null"), CellValue::Null);
        assert_eq!(parse_cell_value("NaN"), CellValue::Null);
        assert_eq!(parse_cell_value("true"), CellValue::Bool(true));
        assert_eq!(parse_cell_value("False"), CellValue::Bool(false));
        assert_eq!(parse_cell_value("42"), CellValue::Int(42));
        assert_eq!(parse_cell_value("3.14"), CellValue::Float(3.14));
        assert_eq!(parse_cell_value("yes"), CellValue::from("yes"));
        assert_eq!(parse_cell_value("inf"), CellValue::from("inf"));
        assert_eq!(
            parse_cell_value("hello"),
            CellValue::String(Cow::Owned("hello".to_string()))
        );
    }

    #[test]
    fn test_parse_counts_and_types() {
        let input = b"id,name,score\n1,a,10\n2,b,\n1,a,10\n";
        let table = CsvParser.parse(input).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), vec!["id", "name", "score"]);
        assert_eq!(table.columns[0].inferred_type, CellType::Int);
        assert_eq!(table.columns[1].inferred_type, CellType::String);
        assert_eq!(table.columns[2].inferred_type, CellType::Int);
        assert_eq!(table.rows[1].cells[2], CellValue::Null);
        assert_eq!(table.rows[2].source_line, 4);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = CsvParser.parse(b"a,b,c\n1\n").unwrap();
        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.missing_count(), 2);
    }

    #[test]
    fn test_duplicate_headers_are_mangled() {
        let table = CsvParser.parse(b"x,x,\n1,2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["x", "x.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_invalid_utf8_is_parse_failure() {
        let err = CsvParser.parse(b"a,b\n\xff\xfe,1\n").unwrap_err();
        assert!(matches!(err, SweepError::ParseFailure { format: "CSV", .. }));
    }
}
