//! Metric instruments for supabase-bootstrap.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("supabase-bootstrap")
}

/// Counter: REST requests sent.
/// Labels: `operation`, `scope`, `result` ("ok" | "error").
pub fn api_requests() -> Counter<u64> {
    meter()
        .u64_counter("supabase.api.requests")
        .with_description("Number of Supabase REST requests")
        .build()
}

/// Histogram: request duration in milliseconds.
/// Labels: `operation`.
pub fn request_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("supabase.api.duration_ms")
        .with_description("Supabase REST request duration in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: table probes during a snapshot.
/// Labels: `result` ("found" | "missing").
pub fn tables_probed() -> Counter<u64> {
    meter()
        .u64_counter("supabase.snapshot.tables_probed")
        .with_description("Tables probed while building a schema snapshot")
        .build()
}
