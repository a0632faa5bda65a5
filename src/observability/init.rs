//! Tracing initialization and subscriber setup.
//!
//! The subscriber stacks three pieces:
//! 1. an `EnvFilter` (`RUST_LOG` wins over the configured `trace_level`)
//! 2. a compact `fmt` layer on stderr, limited to warnings so it never
//!    drowns the interactive output
//! 3. an OpenTelemetry layer exporting every span to
//!    `<data_dir>/bookfinder-spans.jsonl`

use super::tracer::{create_tracer_provider, SERVICE_NAME};
use crate::infrastructure::paths::spans_file;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Flushes and shuts the span exporter down when dropped.
#[must_use = "dropping the guard stops span export"]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("failed to shut down span export: {e}");
            }
        }
    }
}

/// Installs the global subscriber.
///
/// Span export is skipped when the data directory cannot be created; console
/// warnings still work. Calling this twice keeps the first subscriber.
///
/// # Example
///
/// ```no_run
/// use bookfinder::observability::init_tracing;
/// use bookfinder::Config;
///
/// let _guard = init_tracing(&Config::default());
/// tracing::info!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> TracingGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.trace_level));

    let console = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::WARN);

    let provider = match std::fs::create_dir_all(&config.data_dir) {
        Ok(()) => Some(create_tracer_provider(spans_file(&config.data_dir))),
        Err(e) => {
            eprintln!("span export disabled, cannot create {}: {e}", config.data_dir.display());
            None
        }
    };
    let otel = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(otel)
        .try_init();

    TracingGuard { provider }
}
