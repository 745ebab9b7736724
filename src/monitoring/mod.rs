/*!
 * Monitoring Module
 * Structured logging setup and per-operation spans
 */

pub mod tracer;

pub use tracer::{generate_trace_id, init_tracing, init_tracing_with, OperationSpan};
