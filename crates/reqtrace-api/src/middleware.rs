//! Request boundary middleware.
//!
//! Establishes the trace context around the lifetime of one inbound request:
//! a fresh identifier is generated and bound before any handler code runs,
//! and the context is torn down on every exit path before the carrier serves
//! anything else. Errors and panics from inner handlers pass through
//! untouched; this layer only brackets them with context setup and teardown.

use std::collections::HashMap;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use reqtrace_core::{new_trace_id, propagate::with_context, TRACE_ID_KEY};

/// Axum middleware binding a trace context to each request.
///
/// Apply to every route via `axum::middleware::from_fn`. The scope created
/// here is what the propagation adapters snapshot when handlers hand work to
/// the runtime, and what the log formatter and response envelope read.
pub async fn trace_context_middleware(request: Request, next: Next) -> Response {
    let trace_id = new_trace_id();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut context = HashMap::new();
    context.insert(TRACE_ID_KEY.to_string(), trace_id);

    with_context(context, async move {
        tracing::info!(method = %method, uri = %uri, "request started");

        let response = next.run(request).await;

        tracing::info!(
            method = %method,
            uri = %uri,
            status = %response.status(),
            "request completed"
        );
        response
    })
    .await
}
