//! Error types for engine and export operations.

use thiserror::Error;

/// Errors raised by table state operations and settings
#[derive(Error, Debug)]
pub enum TableError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Page size must be positive
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// A key that is not part of the column model
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Operation requires the other paging mode
    #[error("Operation not available in {0} mode")]
    WrongMode(&'static str),
}

/// Result type alias for engine operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while exporting
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to export
    #[error("No data available to export")]
    EmptyDataset,

    /// Column model is empty
    #[error("No columns available to export")]
    NoColumns,

    /// Dataset exceeds what a worksheet can hold
    #[error("Too large for a spreadsheet: {rows} rows x {columns} columns")]
    SheetTooLarge { rows: usize, columns: usize },

    /// Spreadsheet writer failure
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Delimited-text writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error while writing the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// True for conditions the user can fix (nothing selected, nothing loaded)
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ExportError::EmptyDataset | ExportError::NoColumns)
    }
}

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
