//! Cell display.
//!
//! Turns a raw [`Value`] into what a renderer or exporter shows, dispatching
//! on the column's declared [`ColumnKind`]. Unparseable dates and image
//! columns without image URLs fall back to the raw text.

use crate::constants::{DEFAULT_DATE_FORMAT, IMAGE_EXTENSIONS};
use crate::types::{Column, ColumnKind, Value};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Rendered form of one cell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Text(String),
    /// Image URLs, in cell order
    Images(Vec<String>),
}

impl CellView {
    /// Flattened text, images joined with `;`
    pub fn into_text(self) -> String {
        match self {
            CellView::Text(s) => s,
            CellView::Images(urls) => urls.join(crate::constants::LIST_SEPARATOR),
        }
    }
}

/// Render `value` as `column` declares it
pub fn render_cell(column: &Column, value: &Value) -> CellView {
    match column.kind {
        ColumnKind::Image => {
            let urls = image_urls(value);
            if urls.is_empty() {
                CellView::Text(value.to_text())
            } else {
                CellView::Images(urls)
            }
        }
        ColumnKind::Date if !value.is_null() => {
            let pattern = column.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
            CellView::Text(format_date(value, pattern).unwrap_or_else(|| value.to_text()))
        }
        _ => CellView::Text(value.to_text()),
    }
}

/// Text form used by the exporters
pub fn cell_text(column: &Column, value: &Value) -> String {
    render_cell(column, value).into_text()
}

/// Format a date value with `dd`, `MM` and `yyyy` tokens.
///
/// Returns `None` when the value does not parse as a date.
pub fn format_date(value: &Value, pattern: &str) -> Option<String> {
    let date = parse_date(value)?;
    Some(
        pattern
            .replacen("yyyy", &format!("{:04}", date.year()), 1)
            .replacen("MM", &format!("{:02}", date.month()), 1)
            .replacen("dd", &format!("{:02}", date.day()), 1),
    )
}

/// Accepts RFC 3339, ISO date-time, ISO date, or unix milliseconds
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.date_naive())
        }
        Value::Text(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Check if a URL points at an image by extension (case-insensitive)
pub fn is_image_url(url: &str) -> bool {
    url.rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Image URLs contained in a cell
pub fn image_urls(value: &Value) -> Vec<String> {
    match value {
        Value::Text(s) if is_image_url(s) => vec![s.clone()],
        Value::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Text(s) if is_image_url(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
