//! # Loggers
//!
//! Global `tracing` subscriber setup shared by the binaries.
//!
//! ## Contained Modules:
//! - **`setup`**: console layer + daily rolling JSON file layer behind one `EnvFilter`.

pub mod setup;

pub use setup::{setup_logging, LoggingError};
