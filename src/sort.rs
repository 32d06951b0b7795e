//! Row ordering.
//!
//! Stable, three-way comparison on a single key. Strings compare by code
//! point, so `"Alice" < "bob"` (uppercase before lowercase). Null sorts first
//! ascending; descending reverses key order while equal keys keep their
//! source order.

use crate::types::{Column, ColumnKind, Row, SortDirection, SortState, Value};
use std::cmp::Ordering;

/// Sort `rows` by `sort`, returning a new sequence.
///
/// `kind` is the declared kind of the sort column (text when unknown).
pub fn sort_rows(rows: &[Row], sort: &SortState, kind: ColumnKind) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    if sort.key.is_empty() {
        return sorted;
    }
    sorted.sort_by(|a, b| {
        let cmp = compare_values(a.get(&sort.key), b.get(&sort.key), kind);
        match sort.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
    sorted
}

/// Convenience wrapper that looks the kind up in `columns`
pub fn sort_by_columns(rows: &[Row], sort: &SortState, columns: &[Column]) -> Vec<Row> {
    let kind = columns
        .iter()
        .find(|c| c.key == sort.key)
        .map(|c| c.kind)
        .unwrap_or_default();
    sort_rows(rows, sort, kind)
}

/// Three-way comparison of two cells.
///
/// Order across variants: null < bool < number < text < list. In number and
/// date columns, cells that parse sort after nulls and before cells that do
/// not, so mixed columns still have a total order.
pub fn compare_values(a: &Value, b: &Value, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Number => compare_parsed(a, b, kind, Value::as_f64, |x, y| x.total_cmp(y)),
        ColumnKind::Date => {
            compare_parsed(a, b, kind, crate::format::parse_date, |x, y| x.cmp(y))
        }
        ColumnKind::Text | ColumnKind::Image => compare_raw(a, b, kind),
    }
}

fn compare_parsed<T>(
    a: &Value,
    b: &Value,
    kind: ColumnKind,
    parse: impl Fn(&Value) -> Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    if a.is_null() || b.is_null() {
        return compare_raw(a, b, kind);
    }
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_raw(a, b, kind),
    }
}

fn compare_raw(a: &Value, b: &Value, kind: ColumnKind) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::List(x), Value::List(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let cmp = compare_values(l, r, kind);
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Text(_) => 3,
        Value::List(_) => 4,
    }
}
