//! Structured logging and span export.
//!
//! ```text
//! tracing macros → EnvFilter ─┬→ fmt layer (stderr, warnings)
//!                             └→ tracing-opentelemetry → FileSpanExporter → JSON lines
//! ```
//!
//! # Configuration
//!
//! Level is controlled by:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: subscriber setup and the shutdown guard
//! - `tracer`: tracer provider with the file exporter
//! - `span_formatter`: one JSON object per span
//! - `file_writer`: size-rotated line writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TracingGuard};
