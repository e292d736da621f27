//! Exact duplicate row removal

use rustc_hash::FxHashSet;

use crate::model::{CellValue, Table};

/// Remove rows whose cells all equal an earlier row's.
///
/// The first occurrence is kept and row order is preserved. Missing cells
/// compare equal to each other. Returns the number of rows removed.
pub fn deduplicate(table: &mut Table) -> usize {
    let before = table.row_count();

    let mut seen: FxHashSet<Vec<CellValue>> = FxHashSet::default();
    table.rows.retain(|row| seen.insert(row.cells.clone()));

    before - table.row_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn table(rows: &[&[CellValue]]) -> Table {
        let mut t = Table::new(vec![
            Column::new("id", 0),
            Column::new("name", 1),
            Column::new("score", 2),
        ]);
        for (i, r) in rows.iter().enumerate() {
            t.add_row(r.to_vec(), i + 2);
        }
        t.infer_column_types();
        t
    }

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let mut t = table(&[
            &[1i64.into(), "a".into(), 10i64.into()],
            &[2i64.into(), "b".into(), CellValue::Null],
            &[1i64.into(), "a".into(), 10i64.into()],
            &[2i64.into(), "b".into(), CellValue::Null],
            &[3i64.into(), "c".into(), 7i64.into()],
        ]);

        assert_eq!(deduplicate(&mut t), 2);
        let lines: Vec<usize> = t.rows.iter().map(|r| r.source_line).collect();
        assert_eq!(lines, vec![2, 3, 6]);
    }

    #[test]
    fn test_idempotent() {
        let mut t = table(&[
            &[1i64.into(), "a".into(), 10i64.into()],
            &[1i64.into(), "a".into(), 10i64.into()],
        ]);
        deduplicate(&mut t);
        let once = t.clone();
        assert_eq!(deduplicate(&mut t), 0);
        assert_eq!(t, once);
    }

    #[test]
    fn test_int_and_float_cells_of_same_value_are_duplicates() {
        let mut t = table(&[
            &[1i64.into(), "a".into(), 10i64.into()],
            &[1i64.into(), "a".into(), 10.0f64.into()],
        ]);
        assert_eq!(deduplicate(&mut t), 1);
    }
}
