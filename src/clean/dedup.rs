use std::collections::HashSet;

use crate::models::Table;

/// Drop rows identical across every column to an earlier row, keeping the first.
/// Returns the surviving table and how many rows were removed.
pub fn drop_duplicates(table: Table) -> (Table, usize) {
    let (columns, rows) = table.into_parts();
    let before = rows.len();
    let mut seen = HashSet::with_capacity(rows.len());
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.contains(&row) {
            continue;
        }
        seen.insert(row.clone());
        kept.push(row);
    }
    let removed = before - kept.len();
    (Table::from_parts(columns, kept), removed)
}
