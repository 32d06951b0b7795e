//! One table instance: columns, paging, sort, search and the row buffer.
//!
//! ## Modes
//!
//! - **Client**: the full dataset is held locally. Search and sort run over
//!   all of it and the store holds the processed set; the visible page is a
//!   slice of the store.
//! - **Server**: pages come from a [`PageFetcher`](crate::fetch::PageFetcher).
//!   The store holds only the current page. Operations that change the
//!   page, page size or source return a [`FetchTicket`] for the caller to run
//!   and hand back through [`TableEngine::complete_fetch`].
//!
//! In both modes rows flow raw -> search -> sort -> store.

use crate::columns::{ColumnModel, ResizeSession};
use crate::error::{TableError, TableResult};
use crate::export::{ExportFile, ExportFormat, ExportOptions, export_rows};
use crate::fetch::{FetchCoordinator, FetchOutcome, FetchResponse, FetchTicket, Resolution};
use crate::format::{CellView, render_cell};
use crate::notice::Notice;
use crate::pagination::PageState;
use crate::search::{search_field, search_rows};
use crate::settings::TableSettings;
use crate::sort::sort_by_columns;
use crate::store::DataStore;
use crate::types::{Column, ColumnKind, Row, SearchState, SortDirection, SortState};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where rows come from
#[derive(Clone, Debug)]
pub enum Mode {
    Client,
    Server(FetchCoordinator),
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Client => "client",
            Mode::Server(_) => "server",
        }
    }
}

/// Per-table switches
#[derive(Clone, Debug, PartialEq)]
pub struct TableOptions {
    pub enable_search: bool,
    pub enable_sort: bool,
    pub report_title: String,
    /// Choices for the page size selector
    pub page_size_options: Vec<usize>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self::from(&TableSettings::default())
    }
}

impl From<&TableSettings> for TableOptions {
    fn from(settings: &TableSettings) -> Self {
        Self {
            enable_search: settings.enable_search,
            enable_sort: settings.enable_sort,
            report_title: settings.report_title.clone(),
            page_size_options: settings.page_size_options.clone(),
        }
    }
}

/// A resolved fetch plus any follow-up it made necessary.
///
/// `refetch` is set when the response carried a total count that no longer
/// contains the requested page; the page index has already been pulled back
/// and the new request dispatched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub outcome: FetchOutcome,
    pub refetch: Option<FetchTicket>,
}

#[derive(Clone, Debug)]
pub struct TableEngine {
    id: Uuid,
    columns: ColumnModel,
    page: PageState,
    sort: Option<SortState>,
    search: SearchState,
    options: TableOptions,
    /// Unprocessed rows: the whole dataset (client) or the current page (server)
    source: Vec<Row>,
    store: DataStore,
    mode: Mode,
}

impl TableEngine {
    /// Table over a locally held dataset
    pub fn client(columns: Vec<Column>, rows: Vec<Row>, settings: &TableSettings) -> Self {
        let mut engine = Self::build(columns, settings);
        info!(table = %engine.id, rows = rows.len(), columns = engine.columns.len(), "Client table created");
        engine.set_data(rows);
        engine
    }

    /// Table paged by an external fetcher. Returns the engine and the
    /// request for the first page.
    pub fn server(
        columns: Vec<Column>,
        source_id: impl Into<String>,
        settings: &TableSettings,
    ) -> (Self, FetchTicket) {
        let mut coordinator = FetchCoordinator::new(source_id);
        let mut engine = Self::build(columns, settings);
        let ticket = coordinator.dispatch(&engine.page);
        info!(
            table = %engine.id,
            source = coordinator.source_id(),
            columns = engine.columns.len(),
            "Server table created"
        );
        engine.mode = Mode::Server(coordinator);
        (engine, ticket)
    }

    fn build(mut columns: Vec<Column>, settings: &TableSettings) -> Self {
        for column in &mut columns {
            if column.kind == ColumnKind::Date && column.date_format.is_none() {
                column.date_format = Some(settings.date_format.clone());
            }
        }
        let page = PageState::new(settings.initial_page_size()).unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            columns: ColumnModel::new(columns).with_min_width(settings.min_column_width),
            page,
            sort: None,
            search: SearchState::default(),
            options: TableOptions::from(settings),
            source: Vec::new(),
            store: DataStore::new(),
            mode: Mode::Client,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_server(&self) -> bool {
        matches!(self.mode, Mode::Server(_))
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// The materialized dataset: every processed row (client) or the
    /// processed current page (server)
    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    /// Rows on the current page
    pub fn visible_rows(&self) -> &[Row] {
        match self.mode {
            Mode::Client => self.store.slice(self.page.visible_range()),
            Mode::Server(_) => self.store.rows(),
        }
    }

    /// Render a row cell by cell, in column order
    pub fn render_row(&self, row: &Row) -> Vec<CellView> {
        self.columns
            .columns()
            .iter()
            .map(|c| render_cell(c, row.get(&c.key)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows().is_empty()
    }

    /// "No records found." while the current page is empty
    pub fn empty_notice(&self) -> Option<Notice> {
        self.is_empty().then(|| Notice::info("No records found."))
    }

    /// "Showing 10 items | Page: 2"
    pub fn status_line(&self) -> String {
        format!(
            "Showing {} items | Page: {}",
            self.visible_rows().len(),
            self.page.page_index() + 1
        )
    }

    pub fn page_label(&self) -> String {
        self.page.page_label()
    }

    pub fn is_loading(&self) -> bool {
        match &self.mode {
            Mode::Server(coordinator) => coordinator.is_fetching(),
            Mode::Client => false,
        }
    }

    /// Message of the last failed fetch, until the next successful one
    pub fn fetch_error(&self) -> Option<&str> {
        match &self.mode {
            Mode::Server(coordinator) => coordinator.error(),
            Mode::Client => None,
        }
    }

    pub fn source_id(&self) -> Option<&str> {
        match &self.mode {
            Mode::Server(coordinator) => Some(coordinator.source_id()),
            Mode::Client => None,
        }
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Replace the client dataset. Sort and search are reapplied.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        self.source = rows;
        self.rebuild();
    }

    /// Run search and sort over `source` into the store
    fn rebuild(&mut self) {
        let mut rows = if self.options.enable_search && self.search.is_active() {
            match search_field(self.search.field.as_deref(), self.columns.columns()) {
                Some(field) => search_rows(&self.source, field, &self.search.query),
                None => self.source.clone(),
            }
        } else {
            self.source.clone()
        };

        if self.options.enable_sort {
            if let Some(sort) = &self.sort {
                rows = sort_by_columns(&rows, sort, self.columns.columns());
            }
        }

        self.store.replace(rows);
        if let Mode::Client = self.mode {
            if self.page.set_total_count(self.store.len()) {
                debug!(table = %self.id, page = self.page.page_index(), "Page pulled back after data change");
            }
        }
    }

    /// Dispatch when the page moved in server mode
    fn after_move(&mut self, moved: bool) -> Option<FetchTicket> {
        if !moved {
            return None;
        }
        debug!(table = %self.id, page = self.page.page_index(), "Page changed");
        match &mut self.mode {
            Mode::Server(coordinator) => Some(coordinator.dispatch(&self.page)),
            Mode::Client => None,
        }
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Change rows per page; always returns to the first page
    pub fn set_page_size(&mut self, size: usize) -> TableResult<Option<FetchTicket>> {
        let changed = self.page.set_page_size(size)?;
        info!(table = %self.id, size, "Page size changed");
        Ok(self.after_move(changed))
    }

    pub fn go_to(&mut self, page: usize) -> Option<FetchTicket> {
        let moved = self.page.go_to(page);
        self.after_move(moved)
    }

    pub fn next(&mut self) -> Option<FetchTicket> {
        let moved = self.page.next();
        self.after_move(moved)
    }

    pub fn prev(&mut self) -> Option<FetchTicket> {
        let moved = self.page.prev();
        self.after_move(moved)
    }

    pub fn first(&mut self) -> Option<FetchTicket> {
        let moved = self.page.first();
        self.after_move(moved)
    }

    pub fn last(&mut self) -> Option<FetchTicket> {
        let moved = self.page.last();
        self.after_move(moved)
    }

    // ========================================================================
    // Sort & Search
    // ========================================================================

    /// Key the sort picker shows: the active key, else the first column
    pub fn sort_key(&self) -> Option<&str> {
        self.sort
            .as_ref()
            .map(|s| s.key.as_str())
            .or_else(|| self.columns.first_key())
    }

    /// Set or clear the active sort. The page position is kept.
    pub fn set_sort(&mut self, sort: Option<SortState>) -> TableResult<()> {
        if let Some(s) = &sort {
            if !self.columns.contains(&s.key) {
                return Err(TableError::UnknownColumn(s.key.clone()));
            }
        }
        if self.sort == sort {
            return Ok(());
        }
        match &sort {
            Some(s) => info!(table = %self.id, key = %s.key, direction = s.direction.label(), "Sort changed"),
            None => info!(table = %self.id, "Sort cleared"),
        }
        self.sort = sort;
        self.rebuild();
        Ok(())
    }

    /// Sort the current sort key (first column by default) in `direction`
    pub fn set_sort_direction(&mut self, direction: SortDirection) -> TableResult<()> {
        let Some(key) = self.sort_key().map(str::to_string) else {
            return Ok(());
        };
        self.set_sort(Some(SortState::new(key, direction)))
    }

    /// Header click: ascending -> descending -> unsorted. A different column
    /// starts at ascending.
    pub fn toggle_sort(&mut self, key: &str) -> TableResult<()> {
        let next = match &self.sort {
            Some(s) if s.key == key => match s.direction {
                SortDirection::Asc => Some(SortState::desc(key)),
                SortDirection::Desc => None,
            },
            _ => Some(SortState::asc(key)),
        };
        self.set_sort(next)
    }

    /// Field the search box targets: the chosen field, else the first column
    pub fn search_key(&self) -> Option<&str> {
        search_field(self.search.field.as_deref(), self.columns.columns())
    }

    /// Choose the search field. Returns to the first page.
    pub fn set_search_field(&mut self, key: &str) -> TableResult<Option<FetchTicket>> {
        if !self.columns.contains(key) {
            return Err(TableError::UnknownColumn(key.to_string()));
        }
        debug!(table = %self.id, field = key, "Search field changed");
        self.search.field = Some(key.to_string());
        Ok(self.after_search_change())
    }

    /// Set the query. Returns to the first page.
    pub fn set_search_query(&mut self, query: impl Into<String>) -> Option<FetchTicket> {
        self.search.query = query.into();
        debug!(table = %self.id, query = %self.search.query, "Search query changed");
        self.after_search_change()
    }

    fn after_search_change(&mut self) -> Option<FetchTicket> {
        let moved = self.page.rewind();
        self.rebuild();
        self.after_move(moved)
    }

    // ========================================================================
    // Server Paging
    // ========================================================================

    fn coordinator_mut(&mut self) -> TableResult<&mut FetchCoordinator> {
        match &mut self.mode {
            Mode::Server(coordinator) => Ok(coordinator),
            mode => Err(TableError::WrongMode(mode.label())),
        }
    }

    /// Switch datasets: first page, count discarded, rows cleared
    pub fn set_source(&mut self, source_id: impl Into<String>) -> TableResult<Option<FetchTicket>> {
        let Mode::Server(coordinator) = &mut self.mode else {
            return Err(TableError::WrongMode(self.mode.label()));
        };
        if !coordinator.set_source(source_id) {
            return Ok(None);
        }
        self.page.reset();
        self.source.clear();
        self.store.clear();
        Ok(Some(coordinator.dispatch(&self.page)))
    }

    /// Supply the server-side row count
    pub fn set_total_count(&mut self, total: usize) -> TableResult<Option<FetchTicket>> {
        if !self.is_server() {
            return Err(TableError::WrongMode(self.mode.label()));
        }
        let moved = self.page.set_total_count(total);
        debug!(table = %self.id, total, "Total count updated");
        Ok(self.after_move(moved))
    }

    /// Reload: refetch the current page (server) or reprocess (client)
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        match &mut self.mode {
            Mode::Server(coordinator) => Some(coordinator.dispatch(&self.page)),
            Mode::Client => {
                self.rebuild();
                None
            }
        }
    }

    /// Hand back the result of a ticket's fetch
    pub fn complete_fetch(
        &mut self,
        seq: u64,
        result: anyhow::Result<FetchResponse>,
    ) -> TableResult<Completion> {
        let resolution = self.coordinator_mut()?.resolve(seq, result);
        let completion = match resolution {
            Resolution::Apply(response) => {
                let rows = response.rows.len();
                self.source = response.rows;
                self.rebuild();
                let refetch = match response.total_count {
                    Some(total) => {
                        let moved = self.page.set_total_count(total);
                        self.after_move(moved)
                    }
                    None => None,
                };
                info!(table = %self.id, seq, rows, page = self.page.page_index(), "Page applied");
                Completion {
                    outcome: FetchOutcome::Applied { seq, rows },
                    refetch,
                }
            }
            Resolution::Discard { latest } => Completion {
                outcome: FetchOutcome::Discarded { seq, latest },
                refetch: None,
            },
            Resolution::Fail(message) => Completion {
                outcome: FetchOutcome::Failed { seq, message },
                refetch: None,
            },
        };
        Ok(completion)
    }

    // ========================================================================
    // Column Resize
    // ========================================================================

    pub fn resize_start(&mut self, key: &str, start_x: f32, rendered_width: f32) -> TableResult<()> {
        self.columns.begin_resize(key, start_x, rendered_width)
    }

    pub fn resize_move(&mut self, x: f32) -> Option<f32> {
        self.columns.drag_to(x)
    }

    pub fn resize_end(&mut self) {
        self.columns.end_resize();
    }

    /// Scoped gesture; see [`ColumnModel::resize_session`]
    pub fn resize_session(
        &mut self,
        key: &str,
        start_x: f32,
        rendered_width: f32,
    ) -> TableResult<ResizeSession<'_>> {
        self.columns.resize_session(key, start_x, rendered_width)
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Serialize the materialized dataset
    pub fn export(&self, format: ExportFormat) -> Result<ExportFile, Notice> {
        let rows = self.store.snapshot();
        let options = ExportOptions {
            report_title: self.options.report_title.clone(),
        };
        let timestamp = chrono::Utc::now().timestamp_millis();
        export_rows(format, &rows, self.columns.columns(), &options, timestamp).map_err(|err| {
            warn!(table = %self.id, format = format.extension(), error = %err, "Export not produced");
            Notice::from(err)
        })
    }

    /// Export and write into `dir`
    pub fn export_to(&self, format: ExportFormat, dir: &Path) -> Result<PathBuf, Notice> {
        let file = self.export(format)?;
        file.write_to(dir).map_err(Notice::from)
    }
}
