//! OpenTelemetry tracer provider with JSON-lines file export.
//!
//! Spans are exported as they end (simple exporter, no batching) and written
//! one per line through a [`RotatingWriter`].

use super::file_writer::RotatingWriter;
use super::span_formatter::span_line;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry::KeyValue;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Service name stamped on every exported span.
pub const SERVICE_NAME: &str = "bookfinder";

struct FileSpanExporter {
    writer: RotatingWriter,
    is_shutdown: AtomicBool,
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Box::pin(std::future::ready(Err(TraceError::from("exporter is shut down"))));
        }

        let result = batch
            .iter()
            .try_for_each(|span| self.writer.write_line(&span_line(SERVICE_NAME, span).to_string()))
            .map_err(|e| TraceError::from(e.to_string()));

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Creates a tracer provider exporting to `file_path`.
pub fn create_tracer_provider(file_path: PathBuf) -> TracerProvider {
    let exporter = FileSpanExporter {
        writer: RotatingWriter::new(file_path),
        is_shutdown: AtomicBool::new(false),
    };
    let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
