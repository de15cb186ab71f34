//! # Configuration Modules
//!
//! Settings consumed by the fetch/join/cache pipeline. The binaries resolve them from
//! defaults, config files, environment and CLI, then hand a finished value in here.

/// Tunables for fetching, refreshing and publishing the joined directory.
pub mod settings;

pub use settings::{EndpointSettings, PipelineSettings, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_TOTAL};
