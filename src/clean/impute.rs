//! Missing value imputation: mean for numeric columns, mode for the rest

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::model::{CellType, CellValue, Table};

/// Value written into one column's missing cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnFill {
    pub column: String,
    pub value: CellValue,
    pub count: usize,
}

/// Result of an imputation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputeReport {
    /// Cells that received a value
    pub filled: usize,
    /// Missing cells left anywhere in the table afterwards
    pub remaining: usize,
    /// Per-column fill values, for columns that had gaps
    pub fills: Vec<ColumnFill>,
}

/// Fill missing cells in place.
///
/// Numeric columns get the arithmetic mean of their present values, computed
/// once before any cell is filled; such a column becomes `Float`. Other columns
/// get their most frequent value, ties going to the smallest rendered value, and
/// an empty string when nothing is present. Columns typed `Null` have no values
/// to derive a statistic from and are left as they are.
pub fn impute(table: &mut Table) -> ImputeReport {
    let mut report = ImputeReport::default();

    for col_idx in 0..table.column_count() {
        let missing = table.column_values(col_idx).filter(|c| c.is_null()).count();
        if missing == 0 {
            continue;
        }

        let col_type = table.columns[col_idx].inferred_type;
        let fill = match col_type {
            CellType::Null => continue,
            t if t.is_numeric() => match column_mean(table, col_idx) {
                Some(mean) => CellValue::Float(mean),
                None => continue,
            },
            _ => column_mode(table, col_idx).unwrap_or_else(|| CellValue::from("")),
        };

        let numeric = col_type.is_numeric();
        for row in &mut table.rows {
            if let Some(cell) = row.cells.get_mut(col_idx) {
                if cell.is_null() {
                    *cell = fill.clone();
                } else if numeric {
                    if let CellValue::Int(i) = *cell {
                        *cell = CellValue::Float(i as f64);
                    }
                }
            }
        }
        if numeric {
            table.columns[col_idx].inferred_type = CellType::Float;
        }

        report.filled += missing;
        report.fills.push(ColumnFill {
            column: table.columns[col_idx].name.clone(),
            value: fill,
            count: missing,
        });
    }

    report.remaining = table.missing_count();
    report
}

fn column_mean(table: &Table, col_idx: usize) -> Option<f64> {
    let (sum, count) = table
        .column_values(col_idx)
        .filter_map(CellValue::as_f64)
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));

    (count > 0).then(|| sum / count as f64)
}

fn column_mode(table: &Table, col_idx: usize) -> Option<CellValue> {
    let mut counts: FxHashMap<&CellValue, usize> = FxHashMap::default();
    for cell in table.column_values(col_idx).filter(|c| !c.is_null()) {
        *counts.entry(cell).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, na), (b, nb)| match na.cmp(nb) {
            Ordering::Equal => b.display().cmp(&a.display()),
            other => other,
        })
        .map(|(value, _)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn table(columns: &[(&str, CellType)], rows: Vec<Vec<CellValue>>) -> Table {
        let mut t = Table::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, (n, ty))| Column::with_type(*n, i, *ty))
                .collect(),
        );
        for (i, r) in rows.into_iter().enumerate() {
            t.add_row(r, i + 2);
        }
        t
    }

    #[test]
    fn test_numeric_mean_fill() {
        let mut t = table(
            &[("score", CellType::Int)],
            vec![
                vec![10i64.into()],
                vec![CellValue::Null],
                vec![20i64.into()],
                vec![CellValue::Null],
            ],
        );

        let report = impute(&mut t);
        assert_eq!(report.filled, 2);
        assert_eq!(report.remaining, 0);
        assert_eq!(t.rows[1].cells[0], CellValue::Float(15.0));
        assert_eq!(t.rows[3].cells[0], CellValue::Float(15.0));
        assert_eq!(t.columns[0].inferred_type, CellType::Float);

        // mean is unchanged by the fill
        let values: Vec<f64> = t.column_values(0).filter_map(CellValue::as_f64).collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert_eq!(mean, 15.0);
    }

    #[test]
    fn test_mode_fill_prefers_most_frequent_then_smallest() {
        let mut t = table(
            &[("city", CellType::String), ("tag", CellType::String)],
            vec![
                vec!["paris".into(), "b".into()],
                vec!["rome".into(), "a".into()],
                vec!["rome".into(), CellValue::Null],
                vec![CellValue::Null, CellValue::Null],
            ],
        );

        let report = impute(&mut t);
        assert_eq!(t.rows[3].cells[0], CellValue::from("rome"));
        assert_eq!(t.rows[2].cells[1], CellValue::from("a"));
        assert_eq!(report.filled, 3);
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn test_all_missing_text_column_gets_empty_string() {
        let mut t = table(
            &[("note", CellType::String)],
            vec![vec![CellValue::Null], vec![CellValue::Null]],
        );
        let report = impute(&mut t);
        assert_eq!(t.rows[0].cells[0], CellValue::from(""));
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn test_untyped_column_is_left_missing() {
        let mut t = table(
            &[("a", CellType::Int), ("empty", CellType::Null)],
            vec![vec![1i64.into(), CellValue::Null], vec![CellValue::Null, CellValue::Null]],
        );
        let report = impute(&mut t);
        assert_eq!(report.filled, 1);
        assert_eq!(report.remaining, 2);
        assert_eq!(report.fills.len(), 1);
        assert!(t.rows[1].cells[1].is_null());
    }

    #[test]
    fn test_complete_int_column_keeps_its_type() {
        let mut t = table(
            &[("n", CellType::Int)],
            vec![vec![1i64.into()], vec![2i64.into()]],
        );
        let report = impute(&mut t);
        assert_eq!(report, ImputeReport::default());
        assert_eq!(t.columns[0].inferred_type, CellType::Int);
        assert_eq!(t.rows[0].cells[0], CellValue::Int(1));
    }
}
