//! # Core
//!
//! The stateful half of the directory: the cache the server reads from and the
//! machinery that keeps it fresh.
//!
//! ## Contained Modules:
//! - **`cache`**: `JoinedCache`, an atomically swapped snapshot of the joined list.
//! - **`pipeline`**: `RefreshPipeline`, one fetch-both-then-join run.
//! - **`scheduler`**: `RefreshScheduler`, which runs the pipeline at startup and on a
//!   cron schedule and alone decides whether a result gets published.
//! - **`query`**: `QueryService`, read-only listing and paging over the cache.
//! - **`error`**: `RefreshError`.

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod scheduler;

pub use cache::{JoinedCache, Snapshot};
pub use error::RefreshError;
pub use pipeline::RefreshPipeline;
pub use query::{PageSlice, QueryService};
pub use scheduler::RefreshScheduler;
