//! Dispatch and editor metrics.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! application installs a recorder.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `folio_dispatch_total` | Counter | `page_type`, `outcome` | Dispatch decisions |
//! | `folio_dispatch_short_circuit_total` | Counter | `page_type` | Chains stopped by middleware |
//! | `folio_dispatch_duration_seconds` | Histogram | `page_type` | Time spent in middleware and handler |
//! | `folio_array_validation_failures_total` | Counter | `code` | Array editor validation failures |

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Dispatch decision counter.
pub const DISPATCH_TOTAL: &str = "folio_dispatch_total";

/// Short-circuit counter.
pub const DISPATCH_SHORT_CIRCUIT_TOTAL: &str = "folio_dispatch_short_circuit_total";

/// Dispatch duration histogram.
pub const DISPATCH_DURATION_SECONDS: &str = "folio_dispatch_duration_seconds";

/// Array validation failure counter.
pub const ARRAY_VALIDATION_FAILURES_TOTAL: &str = "folio_array_validation_failures_total";

/// Registers descriptions for every Folio metric with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Page-type dispatch decisions by outcome");
    describe_counter!(
        DISPATCH_SHORT_CIRCUIT_TOTAL,
        "Dispatch chains stopped by a middleware before the handler"
    );
    describe_histogram!(
        DISPATCH_DURATION_SECONDS,
        "Time spent running dispatch middleware and handlers"
    );
    describe_counter!(
        ARRAY_VALIDATION_FAILURES_TOTAL,
        "Array field validation failures by code"
    );
}

/// Records one dispatch decision (`accepted`, `not_found`, `handled`, `short_circuited`).
pub fn record_dispatch(page_type: &str, outcome: &'static str) {
    counter!(
        DISPATCH_TOTAL,
        "page_type" => page_type.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Records a middleware short-circuit.
pub fn record_short_circuit(page_type: &str) {
    counter!(DISPATCH_SHORT_CIRCUIT_TOTAL, "page_type" => page_type.to_string()).increment(1);
}

/// Records how long the middleware chain and handler took.
pub fn record_dispatch_duration(page_type: &str, duration: Duration) {
    histogram!(DISPATCH_DURATION_SECONDS, "page_type" => page_type.to_string())
        .record(duration.as_secs_f64());
}

/// Records an array validation failure code.
pub fn record_array_validation_failure(code: &'static str) {
    counter!(ARRAY_VALIDATION_FAILURES_TOTAL, "code" => code).increment(1);
}
