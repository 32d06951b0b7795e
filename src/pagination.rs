//! Page state and navigation.
//!
//! Navigation methods return `true` when the page actually moved so the
//! caller can decide whether a refetch is needed.

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{TableError, TableResult};
use std::ops::Range;

/// Page index, page size and total row count for one table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageState {
    /// Current page (0-indexed)
    page_index: usize,
    /// Rows per page, always > 0
    page_size: usize,
    /// Total number of rows
    total_count: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_count: 0,
        }
    }
}

impl PageState {
    pub fn new(page_size: usize) -> TableResult<Self> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// At least one page, even for an empty table
    pub fn total_pages(&self) -> usize {
        if self.total_count == 0 {
            1
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    pub fn last_page(&self) -> usize {
        self.total_pages() - 1
    }

    pub fn can_go_prev(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page_index < self.last_page()
    }

    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn prev(&mut self) -> bool {
        if self.can_go_prev() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        if self.can_go_next() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn last(&mut self) -> bool {
        self.go_to(self.last_page())
    }

    /// Jump to `page`, clamped into `[0, last_page]`
    pub fn go_to(&mut self, page: usize) -> bool {
        let target = page.min(self.last_page());
        let moved = target != self.page_index;
        self.page_index = target;
        moved
    }

    /// Change the page size. Always returns to the first page.
    pub fn set_page_size(&mut self, size: usize) -> TableResult<bool> {
        if size == 0 {
            return Err(TableError::InvalidPageSize(size));
        }
        let changed = size != self.page_size || self.page_index != 0;
        self.page_size = size;
        self.page_index = 0;
        Ok(changed)
    }

    /// Update the total count, pulling the page index back if the last page
    /// disappeared. Returns `true` when the page index moved.
    pub fn set_total_count(&mut self, total: usize) -> bool {
        self.total_count = total;
        let last = self.last_page();
        if self.page_index > last {
            self.page_index = last;
            true
        } else {
            false
        }
    }

    /// Back to page 0 with the count discarded
    pub fn reset(&mut self) {
        self.page_index = 0;
        self.total_count = 0;
    }

    /// Back to page 0, keeping the count
    pub fn rewind(&mut self) -> bool {
        let moved = self.page_index != 0;
        self.page_index = 0;
        moved
    }

    /// Row range of the current page within a locally held dataset
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(self.total_count);
        let end = start.saturating_add(self.page_size).min(self.total_count);
        start..end
    }

    /// "Page 2 of 7" (1-indexed for display)
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.total_pages())
    }
}
