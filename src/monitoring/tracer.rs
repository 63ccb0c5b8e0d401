/*!
 * RPC Tracing
 * Structured tracing for plugin calls using the tracing crate
 *
 * Features:
 * - Trace ID per call for correlating with plugin-side logs
 * - JSON-formatted logs for structured parsing
 * - Outcome and latency recorded on the span
 */

use std::time::Instant;
use tonic::Status;
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PODNET_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("PODNET_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
        info!("Structured tracing initialized with JSON output");
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
        info!("Structured tracing initialized");
    }
}

/// Generate a unique trace ID for request correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span around one plugin RPC
pub struct RpcSpan {
    span: Span,
    start: Instant,
    method: &'static str,
    trace_id: String,
}

impl RpcSpan {
    pub fn new(method: &'static str, sandbox_id: &str) -> Self {
        let trace_id = generate_trace_id();
        let span = span!(
            Level::DEBUG,
            "plugin_rpc",
            trace_id = %trace_id,
            method = method,
            sandbox_id = sandbox_id,
            duration_us = tracing::field::Empty,
            code = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            method,
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Record the call outcome. Failures are recorded, not reported: the
    /// status goes back to the caller unchanged.
    pub fn finish<T>(&self, result: &Result<T, Status>) {
        let elapsed = self.start.elapsed();
        self.span.record("duration_us", elapsed.as_micros() as u64);
        let _entered = self.span.enter();
        match result {
            Ok(_) => {
                self.span.record("code", "ok");
                debug!(method = self.method, "plugin rpc completed");
            }
            Err(status) => {
                self.span.record("code", tracing::field::debug(status.code()));
                debug!(
                    method = self.method,
                    message = status.message(),
                    "plugin rpc returned status"
                );
            }
        }
    }
}

/// Create a span for a plugin RPC
pub fn span_rpc(method: &'static str, sandbox_id: &str) -> RpcSpan {
    RpcSpan::new(method, sandbox_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_ids_are_unique() {
        let a = span_rpc("AttachInterface", "abc");
        let b = span_rpc("AttachInterface", "abc");
        assert_ne!(a.trace_id(), b.trace_id());
        assert_eq!(a.trace_id().len(), 36);
    }

    #[test]
    fn test_finish_without_subscriber() {
        let span = span_rpc("DetachInterface", "abc");
        span.finish(&Ok::<_, Status>(()));
        span.finish(&Err::<(), _>(Status::unavailable("down")));
    }
}
