//! Context propagation across worker-pool boundaries.
//!
//! Work handed to the runtime executes later, on a different, reused carrier.
//! The decorators here snapshot the submitting carrier's context at wrap
//! time, re-establish it on the executing carrier for the duration of the
//! unit of work, and clear it afterwards so the carrier's next occupant never
//! observes stale values.
//!
//! The decorators only govern context. They take no scheduling decisions,
//! compose with whatever submission or rejection policy the pool enforces,
//! and pass results, errors, and panics through unmodified.

use std::collections::HashMap;
use std::future::Future;

use crate::bridge::TRACE_ID_KEY;
use crate::id::new_trace_id;
use crate::store::{self, ContextGuard};

/// Ensure the executing carrier has a trace identifier, synthesizing one if
/// the propagated context lacked it (work submitted outside any request
/// boundary). The synthesized id is local to this unit of work and is never
/// written back to the submitter.
fn ensure_trace_id() {
    if store::get(TRACE_ID_KEY).is_none() {
        let id = new_trace_id();
        tracing::trace!(trace_id = %id, "no inherited trace id, synthesized one");
        store::set(TRACE_ID_KEY, id);
    }
}

/// Wrap a future for submission to the async runtime.
///
/// Snapshots the caller's context now; when the returned future is polled
/// (possibly much later, on another worker), the snapshot becomes the
/// executing task's context, a trace id is synthesized if missing, and the
/// context is torn down when the future completes, is dropped, or panics.
///
/// ```
/// # use reqtrace_core::propagate::propagate;
/// # async fn demo() {
/// tokio::spawn(propagate(async {
///     tracing::info!("runs with the submitter's trace id");
/// }));
/// # }
/// ```
pub fn propagate<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let snapshot = store::snapshot();
    store::scope(snapshot, async move {
        ensure_trace_id();
        fut.await
    })
}

/// Wrap a closure for submission to a blocking/worker pool.
///
/// Snapshots the caller's context now; when the returned closure runs on a
/// pool thread, the snapshot is bound to that thread, a trace id is
/// synthesized if missing, and the thread's slot is cleared when the closure
/// returns or panics.
///
/// ```
/// # use reqtrace_core::propagate::propagate_blocking;
/// # async fn demo() {
/// tokio::task::spawn_blocking(propagate_blocking(|| {
///     tracing::info!("runs with the submitter's trace id");
/// }));
/// # }
/// ```
pub fn propagate_blocking<F, T>(job: F) -> impl FnOnce() -> T
where
    F: FnOnce() -> T,
{
    let snapshot = store::snapshot();
    move || {
        let _context = ContextGuard::restore(snapshot);
        ensure_trace_id();
        job()
    }
}

/// Wrap a future so it runs under an explicit context instead of the
/// caller's. Used by request boundaries that seed a fresh context rather
/// than inheriting one.
pub fn with_context<F>(context: HashMap<String, String>, fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    store::scope(context, fut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::current_trace_id;

    fn seeded(id: &str) -> HashMap<String, String> {
        let mut ctx = HashMap::new();
        ctx.insert(TRACE_ID_KEY.to_string(), id.to_string());
        ctx
    }

    #[tokio::test]
    async fn test_future_inherits_active_id() {
        let observed = with_context(seeded("T1"), async {
            // Wrap while T1 is active, execute on another carrier later.
            let wrapped = propagate(async {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                current_trace_id()
            });
            tokio::spawn(wrapped).await.unwrap()
        })
        .await;
        assert_eq!(observed, Some("T1".to_string()));
    }

    #[tokio::test]
    async fn test_future_synthesizes_id_when_detached() {
        // No surrounding context at wrap time.
        let a = tokio::spawn(propagate(async { current_trace_id() }))
            .await
            .unwrap();
        let b = tokio::spawn(propagate(async { current_trace_id() }))
            .await
            .unwrap();

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.len(), 36);
        assert_eq!(b.len(), 36);
        // Two detached submissions get distinct identifiers.
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_synthesized_id_not_visible_to_submitter() {
        tokio::spawn(propagate(async {})).await.unwrap();
        assert_eq!(current_trace_id(), None);
    }

    #[tokio::test]
    async fn test_future_leaves_no_residue() {
        with_context(seeded("T1"), async {
            propagate(async {}).await;
            // Still inside the request scope: our own id is intact.
            assert_eq!(current_trace_id(), Some("T1".to_string()));
        })
        .await;
        assert_eq!(current_trace_id(), None);
    }

    #[tokio::test]
    async fn test_blocking_inherits_active_id() {
        let observed = with_context(seeded("T1"), async {
            let job = propagate_blocking(current_trace_id);
            tokio::task::spawn_blocking(job).await.unwrap()
        })
        .await;
        assert_eq!(observed, Some("T1".to_string()));
    }

    #[test]
    fn test_blocking_clears_carrier_after_success() {
        store::set(TRACE_ID_KEY, "T1");
        let job = propagate_blocking(current_trace_id);
        store::clear();

        // Run the wrapped job on this very thread, as a reused pool
        // carrier would.
        assert_eq!(job(), Some("T1".to_string()));
        assert_eq!(current_trace_id(), None);
    }

    #[test]
    fn test_blocking_clears_carrier_after_panic() {
        store::set(TRACE_ID_KEY, "T1");
        let job = propagate_blocking(|| panic!("job failed"));
        store::clear();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job));
        assert!(outcome.is_err());
        // The panic unwound through the guard, which cleared the slot.
        assert_eq!(current_trace_id(), None);
    }

    #[test]
    fn test_blocking_synthesizes_distinct_ids() {
        let a = propagate_blocking(current_trace_id)();
        let b = propagate_blocking(current_trace_id)();
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
        assert_eq!(current_trace_id(), None);
    }

    #[tokio::test]
    async fn test_snapshot_taken_at_wrap_time() {
        let wrapped = with_context(seeded("early"), async {
            propagate(async { current_trace_id() })
        })
        .await;
        // The submitting scope has since ended; the snapshot still carries
        // the id that was active at wrap time.
        let observed = tokio::spawn(wrapped).await.unwrap();
        assert_eq!(observed, Some("early".to_string()));
    }

    #[tokio::test]
    async fn test_errors_pass_through_unmodified() {
        let result: Result<(), String> =
            tokio::spawn(propagate(async { Err("business failure".to_string()) }))
                .await
                .unwrap();
        assert_eq!(result, Err("business failure".to_string()));
    }
}
