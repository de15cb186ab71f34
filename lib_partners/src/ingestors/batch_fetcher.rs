//! # Batch Fetcher
//!
//! Reads one upstream listing completely.
//!
//! ## Workflow:
//! 1.  **Probe**: request a single record to learn the authoritative `total`.
//! 2.  **No data**: a missing, non-numeric or zero `total` ends the fetch with an
//!     empty list, and so does a `total` above `max_total`. This is logged, not raised.
//! 3.  **Plan**: split `[0, total)` into contiguous batches of `batch_size`,
//!     produced lazily as the fan-out pulls them.
//! 4.  **Fan out**: run the batch requests concurrently, at most
//!     `max_concurrency` in flight, and wait for all of them.
//! 5.  **Degrade**: a batch that fails (transport, status, body, timeout)
//!     contributes nothing; the other batches are unaffected.
//! 6.  **Concatenate** the batch results in batch order.
//!
//! The probe and all batches share one end-to-end timeout. When it expires the
//! whole fetch resolves to an empty list.

use crate::configs::{PipelineSettings, DEFAULT_MAX_TOTAL};
use crate::directory::{extract_records, parse_total, DirectoryRecord};
use crate::retrieve::PageSource;
use futures_util::stream::{self, StreamExt};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// One bounded `[start, start + size)` request against a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub start: u64,
    pub size: u64,
}

/// Splits `[0, total)` into contiguous batches; the last one may be shorter.
/// A `batch_size` of zero is treated as one.
pub fn plan_batches(total: u64, batch_size: u64) -> impl Iterator<Item = Batch> {
    let step = batch_size.max(1);
    std::iter::successors(Some(0u64), move |start| start.checked_add(step))
        .take_while(move |start| *start < total)
        .map(move |start| Batch {
            start,
            size: step.min(total - start),
        })
}

/// Fetches every `R` record exposed by one `PageSource`.
pub struct BatchFetcher<R> {
    source: Arc<dyn PageSource>,
    batch_size: u64,
    max_concurrency: usize,
    timeout: Duration,
    max_total: u64,
    _record: PhantomData<fn() -> R>,
}

impl<R: DirectoryRecord> BatchFetcher<R> {
    pub fn new(
        source: Arc<dyn PageSource>,
        batch_size: usize,
        max_concurrency: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1) as u64,
            max_concurrency: max_concurrency.max(1),
            timeout,
            max_total: DEFAULT_MAX_TOTAL,
            _record: PhantomData,
        }
    }

    /// Largest `total` the fetcher will plan batches for.
    pub fn with_max_total(mut self, max_total: u64) -> Self {
        self.max_total = max_total;
        self
    }

    pub fn from_settings(source: Arc<dyn PageSource>, settings: &PipelineSettings) -> Self {
        Self::new(
            source,
            settings.effective_batch_size(),
            settings.effective_concurrency(),
            settings.fetch_timeout(),
        )
        .with_max_total(settings.max_total)
    }

    /// Returns every record the listing exposes, or an empty list when the
    /// listing is empty, unreachable, or too slow. Never fails.
    pub async fn fetch_all(&self) -> Vec<R> {
        match tokio::time::timeout(self.timeout, self.fetch_batches()).await {
            Ok(records) => records,
            Err(_) => {
                warn!(
                    source = self.source.name(),
                    timeout = ?self.timeout,
                    "Fetch of all {} timed out; using an empty list.",
                    R::KIND
                );
                Vec::new()
            }
        }
    }

    async fn fetch_batches(&self) -> Vec<R> {
        let name = self.source.name();

        let probe = match self.source.fetch_page(0, 1).await {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(source = name, error = %e, "Failed to fetch {} total.", R::KIND);
                return Vec::new();
            }
        };

        let total = match parse_total(&probe) {
            Ok(0) => {
                info!(source = name, "Upstream reports 0 {}.", R::KIND);
                return Vec::new();
            }
            Ok(total) if total > self.max_total => {
                warn!(
                    source = name,
                    total,
                    max_total = self.max_total,
                    "Upstream {} total is implausibly large; treating as 0.",
                    R::KIND
                );
                return Vec::new();
            }
            Ok(total) => total,
            Err(e) => {
                warn!(source = name, error = %e, "Could not read {} total; treating as 0.", R::KIND);
                return Vec::new();
            }
        };

        info!(
            source = name,
            total,
            batches = total.div_ceil(self.batch_size),
            batch_size = self.batch_size,
            "Discovered total of {} {}.",
            total,
            R::KIND
        );

        let per_batch: Vec<Vec<R>> = stream::iter(plan_batches(total, self.batch_size))
            .map(|batch| self.fetch_batch(batch))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let records: Vec<R> = per_batch.into_iter().flatten().collect();
        info!(source = name, fetched = records.len(), total, "Fetched {}.", R::KIND);
        records
    }

    async fn fetch_batch(&self, batch: Batch) -> Vec<R> {
        match self.source.fetch_page(batch.start, batch.size).await {
            Ok(envelope) => extract_records(&envelope),
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    start = batch.start,
                    size = batch.size,
                    error = %e,
                    "Batch failed; continuing without it."
                );
                Vec::new()
            }
        }
    }
}
