//! Projector stage: restrict a table to an ordered subset of its columns

use crate::error::{SweepError, SweepResult};
use crate::model::{Column, Row, Table};

/// Check a selection against `table` and return it without repeated names.
///
/// Names are matched exactly; the first unknown name is reported.
pub fn resolve_selection(table: &Table, file: &str, selection: &[String]) -> SweepResult<Vec<String>> {
    let mut resolved: Vec<String> = Vec::with_capacity(selection.len());

    for name in selection {
        if table.column_index(name).is_none() {
            return Err(SweepError::UnknownColumn {
                file: file.to_string(),
                column: name.clone(),
            });
        }
        if !resolved.contains(name) {
            resolved.push(name.clone());
        }
    }

    Ok(resolved)
}

/// Copy of `table` holding exactly the `selected` columns, in selection order.
///
/// Names missing from the table are skipped; use [`resolve_selection`] first
/// to surface them. An empty selection gives a table with no columns but the
/// same number of rows.
pub fn project(table: &Table, selected: &[String]) -> Table {
    let indices: Vec<usize> = selected
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    let columns: Vec<Column> = indices
        .iter()
        .enumerate()
        .map(|(new_idx, &old_idx)| {
            let col = &table.columns[old_idx];
            Column::with_type(col.name.clone(), new_idx, col.inferred_type)
        })
        .collect();

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            let cells = indices.iter().map(|&i| row.cells[i].clone()).collect();
            Row::new(cells, row.source_line)
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    fn sample() -> Table {
        let mut t = Table::new(vec![
            Column::new("id", 0),
            Column::new("name", 1),
            Column::new("score", 2),
        ]);
        t.add_row(vec![1i64.into(), "a".into(), 10i64.into()], 2);
        t.add_row(vec![2i64.into(), "b".into(), CellValue::Null], 3);
        t.infer_column_types();
        t
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_selection_is_noop() {
        let t = sample();
        assert_eq!(project(&t, &t.column_names()), t);
    }

    #[test]
    fn test_reorders_columns() {
        let t = sample();
        let p = project(&t, &names(&["score", "id"]));
        assert_eq!(p.column_names(), names(&["score", "id"]));
        assert_eq!(p.columns[0].index, 0);
        assert_eq!(p.rows[0].cells, vec![CellValue::Int(10), CellValue::Int(1)]);
        assert_eq!(p.row_count(), 2);
    }

    #[test]
    fn test_empty_selection_keeps_rows() {
        let p = project(&sample(), &[]);
        assert_eq!(p.column_count(), 0);
        assert_eq!(p.row_count(), 2);
    }

    #[test]
    fn test_resolve_selection() {
        let t = sample();
        let resolved = resolve_selection(&t, "data.csv", &names(&["name", "id", "name"])).unwrap();
        assert_eq!(resolved, names(&["name", "id"]));

        let err = resolve_selection(&t, "data.csv", &names(&["nope"])).unwrap_err();
        assert_eq!(err.to_string(), "Unknown column 'nope' in data.csv");
    }
}
