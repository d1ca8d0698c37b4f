//! HTTP face of the trace-context subsystem.
//!
//! This crate binds the `reqtrace-core` propagation mechanism to an Axum
//! service:
//!
//! - `middleware`: the request boundary — every inbound request gets a fresh
//!   trace identifier before any handler runs, and the context is gone before
//!   the carrier serves anything else.
//! - `response`: the standard response envelope whose metadata carries the
//!   request's trace identifier back to the caller.
//! - `telemetry`: tracing-subscriber setup that stamps the current trace
//!   identifier onto every emitted log line.
//! - `routes`: job-submission endpoints that hand work to the runtime through
//!   the propagation adapters.

pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod telemetry;

pub use error::ApiError;
pub use middleware::trace_context_middleware;
pub use response::{ApiResponse, ErrorInfo, ResponseMetadata};
pub use routes::{create_router, HandlerState};
pub use telemetry::TraceIdFormat;
