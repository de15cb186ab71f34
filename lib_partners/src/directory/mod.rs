//! # Partner Directory Domain
//!
//! Record shapes published by the two upstream listings, the navigation of their
//! nested JSON envelope, and the left join that turns them into `PartnerSolution`s.
//!
//! ## Contained Modules:
//! - **`html`**: markup stripping applied to description fields on construction.
//! - **`models`**: `RawPartner`, `RawSolution` and the joined output shapes.
//! - **`envelope`**: `total` parsing and record extraction from `results.assets[..]`.
//! - **`join`**: the case-insensitive left join.

pub mod envelope;
pub mod html;
pub mod join;
pub mod models;

pub use envelope::{extract_records, parse_total, TotalError};
pub use join::{join, normalize_name};
pub use models::{DirectoryRecord, PartnerSolution, RawPartner, RawSolution, Solution};
