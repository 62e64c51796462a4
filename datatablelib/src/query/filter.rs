//! Filter stage: free-text search across visible columns.
//!
//! Stages work on row indices into the source dataset, so rows are never
//! copied or mutated while the view is derived.

use crate::data::{cell_text, Column, Row};

/// Whether any of `columns` contains `needle` (already case-folded).
pub fn row_matches(row: &Row, needle: &str, columns: &[&Column]) -> bool {
    columns
        .iter()
        .any(|col| cell_text(col.value(row)).to_lowercase().contains(needle))
}

/// Indices of rows matching `query`, in source order.
///
/// Matching is a case-insensitive substring test against the text of each
/// visible column. An empty query keeps every row.
pub fn filter_rows(rows: &[Row], query: &str, columns: &[&Column]) -> Vec<usize> {
    if query.is_empty() {
        return (0..rows.len()).collect();
    }

    let needle = query.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, &needle, columns))
        .map(|(i, _)| i)
        .collect()
}
