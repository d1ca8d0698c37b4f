//! Trace identifier generation.

use uuid::Uuid;

/// Generate a fresh trace identifier.
///
/// A hyphenated random UUID (36 characters). Collision probability is
/// negligible across the process lifetime and concurrent callers; no shared
/// state is involved.
pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}
