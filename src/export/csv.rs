//! Delimited-text export.
//!
//! Every field is quoted and embedded quotes are doubled, so commas, quotes
//! and line breaks inside cells survive a round trip through any RFC 4180
//! reader. Records end with CRLF.

use crate::error::{ExportError, ExportResult};
use crate::format::cell_text;
use crate::types::{Column, Row};
use ::csv::{QuoteStyle, Terminator, WriterBuilder};

/// Header of column labels, then one record per row
pub fn write_csv(rows: &[Row], columns: &[Column]) -> ExportResult<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label.as_str()))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| cell_text(c, row.get(&c.key))))?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
