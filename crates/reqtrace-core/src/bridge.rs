//! Read access to the current trace identifier for logging backends.
//!
//! Formatters call [`current_trace_id`] at emission time, so the value always
//! reflects the store's state at the moment a record is written out, without
//! the emitting code passing it as a parameter.

use crate::store;

/// The well-known context key under which the trace identifier is stored.
///
/// Shared by the request boundary, the propagation adapters, and logging
/// output templates.
pub const TRACE_ID_KEY: &str = "trace_id";

/// The trace identifier bound to the calling carrier, if any.
///
/// Absence is not an error: work running outside any request boundary and
/// outside a propagated scope simply has no identifier, and callers are
/// expected to omit the field in that case.
pub fn current_trace_id() -> Option<String> {
    store::get(TRACE_ID_KEY)
}
