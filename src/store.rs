//! Materialized rows for display and export.
//!
//! The buffer is swapped wholesale on every sort, search, page or fetch
//! result; nothing mutates rows in place. Each swap bumps a revision so
//! renderers can tell when to redraw.

use crate::types::Row;
use std::ops::Range;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct DataStore {
    rows: Arc<Vec<Row>>,
    revision: u64,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer
    pub fn replace(&mut self, rows: Vec<Row>) {
        self.rows = Arc::new(rows);
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Cheap handle for export; later replacements do not affect it
    pub fn snapshot(&self) -> Arc<Vec<Row>> {
        Arc::clone(&self.rows)
    }

    /// Rows in `range`, clamped to what is held
    pub fn slice(&self, range: Range<usize>) -> &[Row] {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        &self.rows[start..end]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
