//! Column model and resize gestures.
//!
//! ## Resize Transitions
//!
//! ```text
//! Idle -> Resizing   (pointer down on a column's resize handle)
//! Resizing -> Resizing (pointer move: width = start_width + (x - start_x))
//! Resizing -> Idle   (pointer up, cancel, or teardown)
//! ```
//!
//! While a gesture is active the model holds pointer capture, standing in
//! for the global move/up listeners a renderer attaches. [`ResizeSession`]
//! ties that capture to a scope so it is released however the gesture ends.

use crate::constants::MIN_COLUMN_WIDTH;
use crate::error::{TableError, TableResult};
use crate::types::Column;
use std::collections::HashMap;
use tracing::debug;

/// Captured state of an in-progress resize
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeDrag {
    /// Column being resized
    pub key: String,
    /// Pointer X at drag start
    pub start_x: f32,
    /// Rendered width at drag start
    pub start_width: f32,
}

/// Ordered column descriptors plus per-column pixel widths
#[derive(Clone, Debug)]
pub struct ColumnModel {
    columns: Vec<Column>,
    /// Unset means auto width
    widths: HashMap<String, f32>,
    min_width: f32,
    drag: Option<ResizeDrag>,
}

impl ColumnModel {
    /// Build a model. Later duplicates of a key are dropped.
    pub fn new(columns: Vec<Column>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let columns: Vec<Column> = columns
            .into_iter()
            .filter(|c| seen.insert(c.key.clone()))
            .collect();
        Self {
            columns,
            widths: HashMap::new(),
            min_width: MIN_COLUMN_WIDTH,
            drag: None,
        }
    }

    pub fn with_min_width(mut self, min_width: f32) -> Self {
        self.min_width = min_width.max(0.0);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn first_key(&self) -> Option<&str> {
        self.columns.first().map(|c| c.key.as_str())
    }

    /// Key -> label pairs in column order
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|c| (c.key.as_str(), c.label.as_str()))
    }

    /// Explicit width, `None` for auto
    pub fn width(&self, key: &str) -> Option<f32> {
        self.widths.get(key).copied()
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active_drag(&self) -> Option<&ResizeDrag> {
        self.drag.as_ref()
    }

    /// Start a resize on `key`. A gesture already in progress is replaced.
    pub fn begin_resize(&mut self, key: &str, start_x: f32, rendered_width: f32) -> TableResult<()> {
        if !self.contains(key) {
            return Err(TableError::UnknownColumn(key.to_string()));
        }
        if let Some(prev) = self.drag.take() {
            debug!(column = %prev.key, "Resize replaced before release");
        }
        debug!(column = key, start_x, rendered_width, "Resize started");
        self.drag = Some(ResizeDrag {
            key: key.to_string(),
            start_x,
            start_width: rendered_width,
        });
        Ok(())
    }

    /// Apply a pointer move. Returns the new width, or `None` when idle.
    pub fn drag_to(&mut self, x: f32) -> Option<f32> {
        let drag = self.drag.as_ref()?;
        let width = (drag.start_width + (x - drag.start_x)).max(self.min_width);
        self.widths.insert(drag.key.clone(), width);
        Some(width)
    }

    /// Release pointer capture. Safe to call when idle.
    pub fn end_resize(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!(
                column = %drag.key,
                width = ?self.widths.get(&drag.key),
                "Resize finished"
            );
        }
    }

    /// Scoped gesture: capture is released when the session drops.
    pub fn resize_session(
        &mut self,
        key: &str,
        start_x: f32,
        rendered_width: f32,
    ) -> TableResult<ResizeSession<'_>> {
        self.begin_resize(key, start_x, rendered_width)?;
        Ok(ResizeSession { model: self })
    }

    /// Forget an explicit width, returning the column to auto
    pub fn reset_width(&mut self, key: &str) {
        self.widths.remove(key);
    }
}

/// RAII guard for one resize gesture
#[derive(Debug)]
pub struct ResizeSession<'a> {
    model: &'a mut ColumnModel,
}

impl ResizeSession<'_> {
    pub fn drag_to(&mut self, x: f32) -> Option<f32> {
        self.model.drag_to(x)
    }

    /// End the gesture explicitly
    pub fn finish(self) {}
}

impl Drop for ResizeSession<'_> {
    fn drop(&mut self) {
        self.model.end_resize();
    }
}
