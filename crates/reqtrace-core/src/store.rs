//! Per-carrier context store.
//!
//! The store is a string key/value mapping owned by the currently executing
//! logical unit of work. Two kinds of carrier exist under tokio:
//!
//! - **Tasks**: async work migrates between OS threads, so its context lives
//!   in a `task_local!` slot established with [`scope`].
//! - **Pool threads**: synchronous work on blocking/worker threads runs
//!   outside any task-local scope and uses a `thread_local!` slot, managed
//!   through [`ContextGuard`].
//!
//! Every operation consults the task slot first and falls through to the
//! thread slot, so callers never need to know which kind of carrier they are
//! on. Contexts are copied by value between carriers, never shared, so no
//! locking is involved.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;

tokio::task_local! {
    static TASK_CONTEXT: RefCell<HashMap<String, String>>;
}

thread_local! {
    static THREAD_CONTEXT: RefCell<HashMap<String, String>> =
        RefCell::new(HashMap::new());
}

/// Set a context value on the calling carrier.
pub fn set(key: impl Into<String>, value: impl Into<String>) {
    let key = key.into();
    let value = value.into();
    let in_task = TASK_CONTEXT
        .try_with(|slot| {
            slot.borrow_mut().insert(key.clone(), value.clone());
        })
        .is_ok();
    if !in_task {
        THREAD_CONTEXT.with(|slot| {
            slot.borrow_mut().insert(key, value);
        });
    }
}

/// Read a context value from the calling carrier. `None` if absent.
pub fn get(key: &str) -> Option<String> {
    TASK_CONTEXT
        .try_with(|slot| slot.borrow().get(key).cloned())
        .unwrap_or_else(|_| THREAD_CONTEXT.with(|slot| slot.borrow().get(key).cloned()))
}

/// Take an independent copy of the calling carrier's entire mapping.
///
/// Later mutation of the live store does not affect the returned copy, and
/// mutating the copy does not affect the store.
pub fn snapshot() -> HashMap<String, String> {
    TASK_CONTEXT
        .try_with(|slot| slot.borrow().clone())
        .unwrap_or_else(|_| THREAD_CONTEXT.with(|slot| slot.borrow().clone()))
}

/// Replace the calling carrier's mapping wholesale.
pub fn restore(context: HashMap<String, String>) {
    let in_task = TASK_CONTEXT
        .try_with(|slot| slot.borrow_mut().clone_from(&context))
        .is_ok();
    if !in_task {
        THREAD_CONTEXT.with(|slot| *slot.borrow_mut() = context);
    }
}

/// Remove every value from the calling carrier's mapping.
pub fn clear() {
    let in_task = TASK_CONTEXT.try_with(|slot| slot.borrow_mut().clear()).is_ok();
    if !in_task {
        THREAD_CONTEXT.with(|slot| slot.borrow_mut().clear());
    }
}

/// Run a future with its own context mapping, seeded from `seed`.
///
/// The mapping exists only while the returned future is alive. It is dropped
/// on every exit path: normal completion, error return, panic unwind, and
/// cancellation mid-poll. Code running outside the scope (including the same
/// carrier afterwards) observes no residual values.
pub fn scope<F>(seed: HashMap<String, String>, fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    TASK_CONTEXT.scope(RefCell::new(seed), fut)
}

/// RAII guard binding a context to a synchronous pool thread.
///
/// Restores `context` into the thread slot on construction and clears the
/// slot on drop, so the thread's next occupant never observes a previous
/// task's values even if the current one panics.
pub struct ContextGuard {
    _private: (),
}

impl ContextGuard {
    /// Bind `context` to the current thread for the guard's lifetime.
    pub fn restore(context: HashMap<String, String>) -> Self {
        THREAD_CONTEXT.with(|slot| *slot.borrow_mut() = context);
        Self { _private: () }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        THREAD_CONTEXT.with(|slot| slot.borrow_mut().clear());
    }
}
