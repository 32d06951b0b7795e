//! Persistent table settings.
//!
//! Stored as JSON at `<config_dir>/tabula/settings.json`. Missing fields
//! take their defaults, so old files keep loading as options are added.

use crate::constants::{
    DEFAULT_DATE_FORMAT, DEFAULT_PAGE_SIZE, MIN_COLUMN_WIDTH, PAGE_SIZE_OPTIONS, REPORT_TITLE,
};
use crate::error::TableResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Rows per page for new tables
    pub default_page_size: usize,
    /// Choices shown in the page size selector
    pub page_size_options: Vec<usize>,
    /// Pattern for date columns without their own format
    pub date_format: String,
    /// Narrowest width a resize can produce, in pixels
    pub min_column_width: f32,
    /// Where exports are written; `None` uses the download directory
    pub export_dir: Option<PathBuf>,
    /// Title stamped on document exports
    pub report_title: String,
    pub enable_search: bool,
    pub enable_sort: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            min_column_width: MIN_COLUMN_WIDTH,
            export_dir: None,
            report_title: REPORT_TITLE.to_string(),
            enable_search: true,
            enable_sort: true,
        }
    }
}

impl TableSettings {
    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> TableResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Load from the default location, falling back to defaults
    pub fn load_default() -> TableResult<Self> {
        match default_settings_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> TableResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Page size to start with; never zero
    pub fn initial_page_size(&self) -> usize {
        if self.default_page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.default_page_size
        }
    }

    /// Directory exports go to
    pub fn resolved_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// `<config_dir>/tabula/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tabula").join("settings.json"))
}
