//! # Data Retrieval Module
//!
//! HTTP access to the upstream directory listings.
//!
//! ## Contained Modules:
//!
//! - **`ky_http`**: a generic `ApiClient` built on `reqwest`, carrying the base URL,
//!   default headers and timeouts shared by every upstream call.
//! - **`source`**: the `PageSource` seam ("give me records `[start, start+max)` as
//!   JSON") and its HTTP implementation, so the batch fetcher never touches the
//!   network directly.
//! - **`error`**: the `FetchError` taxonomy.

/// Generic HTTP API client for the upstream listings.
pub mod ky_http;
/// Failures while talking to an upstream listing.
pub mod error;
/// Paged access to one listing endpoint.
pub mod source;

pub use error::FetchError;
pub use ky_http::{ApiClient, ApiResponse};
pub use source::{HttpPageSource, PageSource};
