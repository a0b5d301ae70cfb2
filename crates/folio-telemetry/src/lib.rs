//! Observability for Folio.
//!
//! - **Logging**: `tracing-subscriber` setup with JSON or pretty output
//! - **Metrics**: dispatch and array-validation counters via the `metrics`
//!   facade
//!
//! Folio's library crates emit `tracing` events and `metrics` samples
//! unconditionally; both are no-ops until the application installs a
//! subscriber or recorder.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
