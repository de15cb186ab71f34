//! # lib_partners
//!
//! Shared library behind the partner directory server. Each top-level folder is a
//! module gated behind a cargo feature of the same name, so binaries only pull in
//! what they use.
//!
//! ## Modules:
//! - **`configs`**: plain `PipelineSettings` handed in by the binaries.
//! - **`directory`**: upstream record models, envelope navigation, HTML stripping
//!   and the join engine.
//! - **`retrieve`**: the `reqwest` based `ApiClient` and the `PageSource` seam.
//! - **`ingestors`**: the concurrent `BatchFetcher`.
//! - **`core`**: the joined cache, refresh pipeline, scheduler and query service.
//! - **`loggers`**: tracing subscriber setup (console + rolling JSON file).

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "configs")]
pub mod configs;
#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "directory")]
pub mod directory;
#[cfg(feature = "ingestors")]
pub mod ingestors;
#[cfg(feature = "loggers")]
pub mod loggers;
#[cfg(feature = "retrieve")]
pub mod retrieve;

#[cfg(feature = "configs")]
pub use configs::PipelineSettings;
#[cfg(feature = "core")]
pub use crate::core::{JoinedCache, QueryService, RefreshError, RefreshPipeline, RefreshScheduler};
#[cfg(feature = "directory")]
pub use directory::{join, PartnerSolution, RawPartner, RawSolution, Solution};
#[cfg(feature = "ingestors")]
pub use ingestors::BatchFetcher;
#[cfg(feature = "retrieve")]
pub use retrieve::{ApiClient, FetchError, HttpPageSource, PageSource};
