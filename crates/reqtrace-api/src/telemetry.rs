//! Tracing setup with trace-id stamping.
//!
//! [`TraceIdFormat`] wraps a `tracing-subscriber` event formatter and
//! consults the context store at emission time, so every log line written
//! while a request (or propagated unit of work) is executing carries that
//! request's identifier without the call site mentioning it. Records emitted
//! outside any context are written without a prefix.

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{Format, Full, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use reqtrace_core::current_trace_id;

/// Event formatter that prefixes each record with the current trace id.
pub struct TraceIdFormat<E = Format<Full>> {
    inner: E,
}

impl Default for TraceIdFormat {
    fn default() -> Self {
        Self {
            inner: Format::default(),
        }
    }
}

impl<E> TraceIdFormat<E> {
    /// Wrap an arbitrary inner formatter.
    pub fn wrapping(inner: E) -> Self {
        Self { inner }
    }
}

impl<S, N, E> FormatEvent<S, N> for TraceIdFormat<E>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    E: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        // Emission-time lookup: reflects the store at the moment the record
        // is written, not when the log macro was invoked.
        if let Some(trace_id) = current_trace_id() {
            write!(writer, "[{}] ", trace_id)?;
        }
        self.inner.format_event(ctx, writer, event)
    }
}

/// Initialize the global subscriber for the server binary.
///
/// Respects `RUST_LOG`, defaulting to `info`.
pub fn init() {
    tracing_subscriber::fmt()
        .event_format(TraceIdFormat::default())
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();
}
