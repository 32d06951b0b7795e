//! Engine-wide constants.
//!
//! Centralizes defaults and export layout values so the engine and its
//! settings agree on them.

// ============================================================================
// Paging
// ============================================================================

/// Rows per page when nothing else is configured
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Page size choices offered to the user
pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 30, 40, 50, 100, 150, 200, 500, 1000];

// ============================================================================
// Cells
// ============================================================================

/// Display pattern for date columns without an explicit format
pub const DEFAULT_DATE_FORMAT: &str = "dd-MM-yyyy";

/// Separator used when a multi-value cell is flattened to text
pub const LIST_SEPARATOR: &str = ";";

/// File extensions recognised as images in image columns
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "gif", "svg"];

// ============================================================================
// Column Resize
// ============================================================================

/// Narrowest width a resize gesture can produce, in pixels
pub const MIN_COLUMN_WIDTH: f32 = 30.0;

// ============================================================================
// Export
// ============================================================================

/// Suffix shared by every exported file name: `<unix-ms>_table_export.<ext>`
pub const EXPORT_FILE_STEM: &str = "table_export";

/// Label stamped on the first page of document exports
pub const REPORT_TITLE: &str = "Exported Table Report";

/// Worksheet name for spreadsheet exports
pub const SHEET_NAME: &str = "Table Export";

/// Excel row limit, header included
pub const MAX_SHEET_ROWS: usize = 1_048_576;

/// Excel column limit
pub const MAX_SHEET_COLUMNS: usize = 16_384;

// ============================================================================
// Document Layout (points, 1/72 inch)
// ============================================================================

/// Page margin on every side
pub const PDF_MARGIN: f32 = 36.0;

/// Body text size
pub const PDF_FONT_SIZE: f32 = 9.0;

/// Title text size on the first page
pub const PDF_TITLE_SIZE: f32 = 14.0;

/// Height of one table row
pub const PDF_ROW_HEIGHT: f32 = 16.0;

/// Average Helvetica glyph width as a fraction of the font size
pub const PDF_AVG_GLYPH_WIDTH: f32 = 0.5;
