//! Table export.
//!
//! Three independent serializers over the full materialized row set and the
//! column model, in column order:
//!
//! - [`csv`]: every field quoted, CRLF records
//! - [`xlsx`]: one worksheet, bold header row
//! - [`pdf`]: landscape pages, paper size picked from the column count
//!
//! File names follow `<unix-ms>_table_export.<ext>`.

pub mod csv;
pub mod pdf;
pub mod xlsx;

use crate::constants::{EXPORT_FILE_STEM, REPORT_TITLE};
use crate::error::{ExportError, ExportResult};
use crate::types::{Column, Row};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Parse `csv`, `xlsx` or `pdf` (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }
}

/// Export options not carried by the rows or columns
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Stamped on the first page of document exports
    pub report_title: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            report_title: REPORT_TITLE.to_string(),
        }
    }
}

/// A serialized export, ready to download or write
#[derive(Clone, Debug)]
pub struct ExportFile {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Write into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "Export written");
        Ok(path)
    }
}

/// `<unix-ms>_table_export.<ext>`
pub fn export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("{}_{}.{}", timestamp_ms, EXPORT_FILE_STEM, format.extension())
}

/// Serialize `rows` in `format`, naming the file after `timestamp_ms`
pub fn export_rows(
    format: ExportFormat,
    rows: &[Row],
    columns: &[Column],
    options: &ExportOptions,
    timestamp_ms: i64,
) -> ExportResult<ExportFile> {
    if columns.is_empty() {
        return Err(ExportError::NoColumns);
    }
    if rows.is_empty() {
        return Err(ExportError::EmptyDataset);
    }

    let bytes = match format {
        ExportFormat::Csv => csv::write_csv(rows, columns)?,
        ExportFormat::Xlsx => xlsx::write_xlsx(rows, columns)?,
        ExportFormat::Pdf => pdf::write_pdf(rows, columns, &options.report_title),
    };

    info!(
        format = format.extension(),
        rows = rows.len(),
        columns = columns.len(),
        bytes = bytes.len(),
        "Table exported"
    );

    Ok(ExportFile {
        file_name: export_file_name(format, timestamp_ms),
        format,
        bytes,
    })
}
