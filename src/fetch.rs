//! Server-driven paging.
//!
//! Every dispatch takes a new sequence number. When a response comes back it
//! is applied only if its number is still the latest one dispatched; older
//! responses are dropped on arrival instead of being cancelled in flight.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Fetching        (page, page size or source changed)
//! Fetching -> Fetching    (newer dispatch supersedes the pending one)
//! Fetching -> Idle        (latest response applied, or latest failed)
//! ```
//!
//! A failure keeps the previously applied rows and raises the error flag
//! until the next successful apply.

use crate::pagination::PageState;
use crate::types::Row;
use async_trait::async_trait;
use std::future::Future;
use tracing::{debug, info, warn};

/// What to fetch. `page_index` is 0-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub page_index: usize,
    pub page_size: usize,
    /// Logical dataset being browsed
    pub source_id: String,
}

/// One page of rows.
///
/// The page payload never implies a total; `total_count` is the optional
/// out-of-band channel for it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchResponse {
    pub rows: Vec<Row>,
    pub total_count: Option<usize>,
}

impl FetchResponse {
    pub fn with_total(rows: Vec<Row>, total_count: usize) -> Self {
        Self {
            rows,
            total_count: Some(total_count),
        }
    }
}

impl From<Vec<Row>> for FetchResponse {
    fn from(rows: Vec<Row>) -> Self {
        Self {
            rows,
            total_count: None,
        }
    }
}

/// A dispatched fetch, to be resolved with [`FetchCoordinator::resolve`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: FetchRequest,
}

/// Consumer-supplied page source
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: FetchRequest) -> anyhow::Result<FetchResponse>;
}

/// Adapts an async closure `(request) -> rows` into a [`PageFetcher`]
pub struct FnFetcher<F>(pub F);

#[async_trait]
impl<F, Fut> PageFetcher for FnFetcher<F>
where
    F: Fn(FetchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<Row>>> + Send + 'static,
{
    async fn fetch_page(&self, request: FetchRequest) -> anyhow::Result<FetchResponse> {
        (self.0)(request).await.map(FetchResponse::from)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    /// Waiting on the response for `seq`
    Fetching { seq: u64 },
}

/// What [`FetchCoordinator::resolve`] decided
#[derive(Debug)]
pub enum Resolution {
    /// Latest response: write it to the store
    Apply(FetchResponse),
    /// Superseded by a newer dispatch
    Discard { latest: u64 },
    /// Latest request failed; keep what is shown
    Fail(String),
}

/// Result of a resolved fetch, as reported to callers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { seq: u64, rows: usize },
    Discarded { seq: u64, latest: u64 },
    Failed { seq: u64, message: String },
}

/// Sequence bookkeeping for server-driven paging
#[derive(Clone, Debug)]
pub struct FetchCoordinator {
    source_id: String,
    /// Last sequence number handed out (0 = none yet)
    latest: u64,
    phase: FetchPhase,
    error: Option<String>,
}

impl FetchCoordinator {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            latest: 0,
            phase: FetchPhase::Idle,
            error: None,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, FetchPhase::Fetching { .. })
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch datasets. Returns `true` when the id actually changed.
    pub fn set_source(&mut self, source_id: impl Into<String>) -> bool {
        let source_id = source_id.into();
        if source_id == self.source_id {
            return false;
        }
        info!(from = %self.source_id, to = %source_id, "Switching data source");
        self.source_id = source_id;
        true
    }

    /// Issue a new request for the current page
    pub fn dispatch(&mut self, page: &PageState) -> FetchTicket {
        self.latest += 1;
        let seq = self.latest;
        self.phase = FetchPhase::Fetching { seq };

        let request = FetchRequest {
            page_index: page.page_index(),
            page_size: page.page_size(),
            source_id: self.source_id.clone(),
        };
        debug!(
            seq,
            page = request.page_index,
            size = request.page_size,
            source = %request.source_id,
            "Dispatching page fetch"
        );
        FetchTicket { seq, request }
    }

    /// Decide what to do with the response for `seq`
    pub fn resolve(&mut self, seq: u64, result: anyhow::Result<FetchResponse>) -> Resolution {
        if seq != self.latest {
            debug!(seq, latest = self.latest, "Discarding superseded page response");
            return Resolution::Discard {
                latest: self.latest,
            };
        }

        self.phase = FetchPhase::Idle;
        match result {
            Ok(response) => {
                debug!(seq, rows = response.rows.len(), "Applying page response");
                self.error = None;
                Resolution::Apply(response)
            }
            Err(err) => {
                let message = format!("{:#}", err);
                warn!(seq, error = %message, "Page fetch failed, keeping previous rows");
                self.error = Some(message.clone());
                Resolution::Fail(message)
            }
        }
    }
}
