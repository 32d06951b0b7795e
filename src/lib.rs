//! Tabular data engine.
//!
//! One [`TableEngine`] per table: a column model with live resize, client or
//! server paging, stable single-key sorting, case-insensitive search, and
//! csv/xlsx/pdf export of the materialized rows.
//!
//! Modules, leaf-first:
//! - `types` - values, rows, columns, sort and search state
//! - `columns` - column model and resize gestures
//! - `sort` / `search` - pure row transforms
//! - `pagination` - page index, size and count
//! - `fetch` - latest-request-wins sequencing for server paging
//! - `store` - the materialized row buffer
//! - `export` - csv, xlsx and pdf serializers
//! - `table` - the engine tying these together
//! - `server` - async driver over a [`PageFetcher`]

pub mod columns;
pub mod constants;
pub mod error;
pub mod export;
pub mod fetch;
pub mod format;
pub mod logging;
pub mod notice;
pub mod pagination;
pub mod search;
pub mod server;
pub mod settings;
pub mod sort;
pub mod store;
pub mod table;
pub mod types;

pub use columns::{ColumnModel, ResizeSession};
pub use error::{ExportError, ExportResult, TableError, TableResult};
pub use export::{ExportFile, ExportFormat, ExportOptions};
pub use fetch::{FetchOutcome, FetchRequest, FetchResponse, FetchTicket, FnFetcher, PageFetcher};
pub use notice::{Notice, NoticeLevel};
pub use pagination::PageState;
pub use server::{PendingFetch, ServerTable};
pub use settings::TableSettings;
pub use table::{Completion, Mode, TableEngine, TableOptions};
pub use types::{Column, ColumnKind, Row, SearchState, SortDirection, SortState, Value};
