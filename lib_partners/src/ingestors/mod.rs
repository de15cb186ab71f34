//! # Data Ingestors Module
//!
//! Pulls complete record sets out of paginated upstream listings.
//!
//! ## Contained Modules:
//! - **`batch_fetcher`**: probes a listing's `total`, splits it into batches and
//!   fetches them concurrently under a cap, degrading failed batches to nothing.

/// Concurrent, failure-tolerant batch fetching for one listing.
pub mod batch_fetcher;

pub use batch_fetcher::{plan_batches, Batch, BatchFetcher};
