//! Per-request trace context propagation.
//!
//! This crate provides the mechanism that correlates every log line and the
//! final response produced while handling one inbound request, including work
//! that continues on other workers, through a single identifier created once
//! per request.
//!
//! # Components
//!
//! - [`store`]: a per-carrier key/value context store with snapshot/restore
//!   semantics. Async work is keyed by tokio task, synchronous pool work by
//!   thread.
//! - [`id`]: trace identifier generation (random UUID v4).
//! - [`propagate`]: decorators that make spawned work inherit the submitting
//!   carrier's context and clean up after themselves.
//! - [`bridge`]: read access for logging backends, under the well-known
//!   [`TRACE_ID_KEY`] context key.
//!
//! # Usage
//!
//! 1. A request boundary (HTTP middleware or equivalent) seeds a context
//!    scope with a fresh trace id via [`store::scope`].
//! 2. Any work handed to the runtime is wrapped with [`propagate`] (futures)
//!    or [`propagate_blocking`] (closures) before submission.
//! 3. The logging backend consults [`current_trace_id`] at emission time.

pub mod bridge;
pub mod id;
pub mod propagate;
pub mod store;

pub use bridge::{current_trace_id, TRACE_ID_KEY};
pub use id::new_trace_id;
pub use propagate::{propagate, propagate_blocking};
pub use store::ContextGuard;
