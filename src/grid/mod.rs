//! Customer data grid engine.
//!
//! [`CustomerGrid`] owns the working set fetched from the backend and derives
//! the filtered set, the visible page and the export report from it. The
//! working set is only ever replaced by [`CustomerGrid::complete_load`];
//! filtering and paging never mutate it.
//!
//! Loads are split in two halves so the network call can run without holding
//! the engine: [`CustomerGrid::begin_load`] issues a sequence-numbered
//! [`LoadTicket`] and [`CustomerGrid::complete_load`] applies the result unless
//! a newer load has already been applied. A load that never completes must be
//! handed back through [`CustomerGrid::abandon_load`].

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;

use crate::domain::customer::CustomerRecord;
use crate::domain::filter::FilterCriteria;
use crate::grid::pagination::{
    BASE_PAGE_SIZES, PageWindow, Paginated, nearest_page_size, page_size_options,
};
use crate::grid::metrics::WorkingSetMetrics;
use crate::grid::report::ExportReport;

pub mod metrics;
pub mod pagination;
pub mod report;

/// Errors raised by the grid engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Requested page size is not one of the current candidates.
    #[error("page size {requested} is not offered, expected one of {valid:?}")]
    InvalidPageSize { requested: usize, valid: Vec<usize> },
}

/// Lifecycle of the working set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
    Unauthorized,
}

/// Result of fetching the working set from the backend.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(Vec<CustomerRecord>),
    Unauthorized,
    Failed(String),
}

/// What [`CustomerGrid::complete_load`] did with a fetch result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { records: usize },
    Unauthorized,
    Failed(String),
    /// A newer load was already applied; the result was dropped.
    Discarded,
}

/// Proof that a load was started; consumed when the load completes.
#[derive(Debug)]
#[must_use]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct CustomerGrid {
    records: Vec<CustomerRecord>,
    criteria: FilterCriteria,
    /// Indices into `records` matching `criteria`, in working-set order.
    filtered: Vec<usize>,
    window: PageWindow,
    /// State left by the newest settled load.
    settled: LoadState,
    /// Tickets issued and not yet completed or abandoned.
    in_flight: BTreeSet<u64>,
    loaded: bool,
    last_error: Option<String>,
    issued_seq: u64,
    applied_seq: u64,
}

impl Default for CustomerGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerGrid {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            filtered: Vec::new(),
            window: PageWindow::new(BASE_PAGE_SIZES[0]),
            settled: LoadState::Idle,
            in_flight: BTreeSet::new(),
            loaded: false,
            last_error: None,
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    /// Builds a ready grid over an already known working set.
    pub fn with_records(records: Vec<CustomerRecord>) -> Self {
        let mut grid = Self::new();
        grid.install(records);
        grid.loaded = true;
        grid.settled = LoadState::Ready;
        grid
    }

    /// Starts a load and returns the ticket that must accompany its result.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued_seq += 1;
        self.in_flight.insert(self.issued_seq);
        log::debug!("Starting customer load #{}", self.issued_seq);
        LoadTicket {
            seq: self.issued_seq,
        }
    }

    /// Applies the result of the load identified by `ticket`.
    ///
    /// Results older than the newest applied one are discarded. Failures keep
    /// the previous working set.
    pub fn complete_load(&mut self, ticket: LoadTicket, outcome: FetchOutcome) -> LoadOutcome {
        self.in_flight.remove(&ticket.seq);
        if ticket.seq <= self.applied_seq {
            log::info!(
                "Discarding stale customer load #{} (newest applied #{})",
                ticket.seq,
                self.applied_seq
            );
            return LoadOutcome::Discarded;
        }
        self.applied_seq = ticket.seq;

        let (state, result) = match outcome {
            FetchOutcome::Loaded(records) => {
                let count = records.len();
                self.install(records);
                self.loaded = true;
                self.last_error = None;
                log::info!("Customer load #{} applied with {count} records", ticket.seq);
                (LoadState::Ready, LoadOutcome::Applied { records: count })
            }
            FetchOutcome::Unauthorized => {
                log::warn!("Customer load #{} rejected as unauthorized", ticket.seq);
                (LoadState::Unauthorized, LoadOutcome::Unauthorized)
            }
            FetchOutcome::Failed(message) => {
                log::error!("Customer load #{} failed: {message}", ticket.seq);
                self.last_error = Some(message.clone());
                (LoadState::Failed, LoadOutcome::Failed(message))
            }
        };

        self.settled = state;
        result
    }

    /// Withdraws a load whose result will never arrive.
    ///
    /// The working set and the settled state are left untouched.
    pub fn abandon_load(&mut self, ticket: LoadTicket) {
        if self.in_flight.remove(&ticket.seq) {
            log::info!("Customer load #{} abandoned", ticket.seq);
        }
    }

    /// `Loading` while any issued load is still outstanding, otherwise the
    /// state left by the newest applied load.
    pub fn state(&self) -> LoadState {
        if self.in_flight.is_empty() {
            self.settled
        } else {
            LoadState::Loading
        }
    }

    /// Whether a working set has ever been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Recomputes the filtered set for `criteria` and returns to page 1.
    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
        self.window.current_page = 1;
    }

    pub fn filtered(&self) -> impl Iterator<Item = &CustomerRecord> + '_ {
        self.filtered.iter().map(|&idx| &self.records[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Page sizes valid for the current filtered set.
    pub fn page_size_options(&self) -> Vec<usize> {
        page_size_options(self.filtered.len())
    }

    /// Switches to `size` and returns to page 1.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), GridError> {
        let valid = self.page_size_options();
        if !valid.contains(&size) {
            return Err(GridError::InvalidPageSize {
                requested: size,
                valid,
            });
        }
        self.window = PageWindow::new(size);
        Ok(())
    }

    /// Moves to page `page`, silently clamped into the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.window.go_to(page, self.filtered.len());
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered.len(), self.window.page_size)
    }

    /// Records on the visible page.
    pub fn page_records(&self) -> Vec<&CustomerRecord> {
        self.filtered[self.window.bounds(self.filtered.len())]
            .iter()
            .map(|&idx| &self.records[idx])
            .collect()
    }

    /// The visible page with navigation data.
    pub fn page(&self) -> Paginated<CustomerRecord> {
        let items = self.page_records().into_iter().cloned().collect();
        Paginated::new(items, self.window, self.filtered.len())
    }

    /// Report over the whole filtered set, independent of the visible page.
    pub fn export_report(&self) -> ExportReport {
        ExportReport::from_records(self.filtered())
    }

    /// Dashboard figures over the whole working set, ignoring the filter.
    pub fn metrics(&self) -> WorkingSetMetrics {
        WorkingSetMetrics::from_records(&self.records)
    }

    fn install(&mut self, records: Vec<CustomerRecord>) {
        self.records = records;
        self.criteria = FilterCriteria::default();
        self.refilter();
        self.window.current_page = 1;
    }

    fn refilter(&mut self) {
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.criteria.matches(record))
            .map(|(idx, _)| idx)
            .collect();
        self.normalize_page_size();
    }

    /// Keeps the page size when still offered, otherwise falls back to the
    /// largest offered size below it, or the smallest offered size.
    fn normalize_page_size(&mut self) {
        let options = self.page_size_options();
        self.window.page_size = nearest_page_size(Some(self.window.page_size), &options);
    }
}

/// Engine shared between request handlers.
///
/// The lock is only held for in-memory work; never across an `.await`. A
/// panic while holding it does not disable the grid: the next caller takes
/// the engine over as it was left.
#[derive(Debug, Default)]
pub struct GridHandle {
    inner: Mutex<CustomerGrid>,
}

impl GridHandle {
    pub fn new(grid: CustomerGrid) -> Self {
        Self {
            inner: Mutex::new(grid),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, CustomerGrid> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::error!("Customer grid lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Issues a load whose ticket is withdrawn again if the returned guard is
    /// dropped before [`PendingLoad::complete`] runs.
    pub fn start_load(&self) -> PendingLoad<'_> {
        let ticket = self.lock().begin_load();
        PendingLoad {
            handle: self,
            ticket: Some(ticket),
        }
    }
}

/// A load in flight against a [`GridHandle`].
#[derive(Debug)]
#[must_use]
pub struct PendingLoad<'a> {
    handle: &'a GridHandle,
    ticket: Option<LoadTicket>,
}

impl PendingLoad<'_> {
    pub fn complete(mut self, outcome: FetchOutcome) -> LoadOutcome {
        match self.ticket.take() {
            Some(ticket) => self.handle.lock().complete_load(ticket, outcome),
            None => LoadOutcome::Discarded,
        }
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            log::warn!("Customer load #{} dropped before completion", ticket.seq());
            self.handle.lock().abandon_load(ticket);
        }
    }
}
