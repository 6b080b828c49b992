//! Span helpers for Supabase REST requests.
//!
//! Every request made by [`SupabaseClient`](crate::client::SupabaseClient)
//! runs inside a `supabase.request` span. The API key never appears on it.

use tracing::Span;

/// Start a span for one REST call.
///
/// `supabase.status` is declared empty and filled by [`record_status`].
pub fn start_request_span(operation: &str, scope: &str, path: &str) -> Span {
    tracing::info_span!(
        "supabase.request",
        "supabase.operation" = operation,
        "supabase.scope" = scope,
        "supabase.path" = path,
        "supabase.status" = tracing::field::Empty,
    )
}

/// Record the outcome on a span created by [`start_request_span`].
pub fn record_status(span: &Span, status: &str) {
    span.record("supabase.status", status);
}
