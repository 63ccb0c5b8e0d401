/*!
 * Monitoring Module
 * Structured tracing for plugin RPCs
 */

pub mod tracer;

pub use tracer::{generate_trace_id, init_tracing, span_rpc, RpcSpan};
