//! Async driver for server-paged tables.
//!
//! [`ServerTable`] pairs a [`TableEngine`] with a [`PageFetcher`]. Navigation
//! is synchronous and returns a [`PendingFetch`]; awaiting it runs the fetch
//! without holding the engine lock, then hands the result back to the
//! engine, which applies it only if it is still the latest request.

use crate::error::TableResult;
use crate::fetch::{FetchOutcome, FetchTicket, PageFetcher};
use crate::settings::TableSettings;
use crate::table::TableEngine;
use crate::types::Column;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerTable {
    engine: Arc<Mutex<TableEngine>>,
    fetcher: Arc<dyn PageFetcher>,
}

impl ServerTable {
    /// Create the table; the returned fetch loads the first page
    pub fn new(
        columns: Vec<Column>,
        source_id: impl Into<String>,
        settings: &TableSettings,
        fetcher: Arc<dyn PageFetcher>,
    ) -> (Self, PendingFetch) {
        let (engine, ticket) = TableEngine::server(columns, source_id, settings);
        let table = Self {
            engine: Arc::new(Mutex::new(engine)),
            fetcher,
        };
        let pending = table.pending(Some(ticket));
        (table, pending)
    }

    /// Run `f` against the engine under the lock
    pub fn with<R>(&self, f: impl FnOnce(&TableEngine) -> R) -> R {
        f(&self.engine.lock())
    }

    /// Apply an engine operation that may dispatch a fetch
    pub fn update(&self, f: impl FnOnce(&mut TableEngine) -> Option<FetchTicket>) -> PendingFetch {
        let ticket = f(&mut self.engine.lock());
        self.pending(ticket)
    }

    /// Like [`update`](Self::update) for fallible operations
    pub fn try_update(
        &self,
        f: impl FnOnce(&mut TableEngine) -> TableResult<Option<FetchTicket>>,
    ) -> TableResult<PendingFetch> {
        let ticket = f(&mut self.engine.lock())?;
        Ok(self.pending(ticket))
    }

    pub fn go_to(&self, page: usize) -> PendingFetch {
        self.update(|engine| engine.go_to(page))
    }

    pub fn next(&self) -> PendingFetch {
        self.update(TableEngine::next)
    }

    pub fn prev(&self) -> PendingFetch {
        self.update(TableEngine::prev)
    }

    pub fn first(&self) -> PendingFetch {
        self.update(TableEngine::first)
    }

    pub fn last(&self) -> PendingFetch {
        self.update(TableEngine::last)
    }

    pub fn refresh(&self) -> PendingFetch {
        self.update(TableEngine::refresh)
    }

    pub fn set_page_size(&self, size: usize) -> TableResult<PendingFetch> {
        self.try_update(|engine| engine.set_page_size(size))
    }

    pub fn set_source(&self, source_id: impl Into<String>) -> TableResult<PendingFetch> {
        self.try_update(|engine| engine.set_source(source_id))
    }

    pub fn set_total_count(&self, total: usize) -> TableResult<PendingFetch> {
        self.try_update(|engine| engine.set_total_count(total))
    }

    fn pending(&self, ticket: Option<FetchTicket>) -> PendingFetch {
        PendingFetch {
            ticket,
            engine: Arc::clone(&self.engine),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

/// A dispatched request that has not run yet. Dropping it leaves the
/// engine in the fetching state until a newer request completes.
#[must_use = "a pending fetch does nothing until run"]
pub struct PendingFetch {
    ticket: Option<FetchTicket>,
    engine: Arc<Mutex<TableEngine>>,
    fetcher: Arc<dyn PageFetcher>,
}

impl PendingFetch {
    /// Sequence number, `None` when nothing was dispatched
    pub fn seq(&self) -> Option<u64> {
        self.ticket.as_ref().map(|t| t.seq)
    }

    /// Fetch and resolve. Follow-up requests caused by a shrinking total
    /// are run too; the last outcome is returned.
    pub async fn run(self) -> TableResult<Option<FetchOutcome>> {
        let mut ticket = self.ticket;
        let mut outcome = None;
        while let Some(current) = ticket.take() {
            let result = self.fetcher.fetch_page(current.request).await;
            let completion = self.engine.lock().complete_fetch(current.seq, result)?;
            outcome = Some(completion.outcome);
            ticket = completion.refetch;
        }
        Ok(outcome)
    }
}
