//! Case-insensitive substring filtering on one field.

use crate::types::{Column, Row};

/// Resolve the field to search: explicit field, else the first column.
pub fn search_field<'a>(field: Option<&'a str>, columns: &'a [Column]) -> Option<&'a str> {
    field.or_else(|| columns.first().map(|c| c.key.as_str()))
}

/// Rows whose `field` contains `query`, ignoring case.
///
/// An empty query returns every row.
pub fn search_rows(rows: &[Row], field: &str, query: &str) -> Vec<Row> {
    if query.is_empty() {
        return rows.to_vec();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .filter(|row| row.get(field).to_text().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
