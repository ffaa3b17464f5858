/*!
Logging and profiling setup for the command-line binary.

Log output goes to stderr so stdout stays reserved for tile records. When the
`profiling` feature is compiled in, a Chrome trace layer can be attached as well;
the returned guard must be kept alive until the run ends so the trace gets flushed.
*/

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when RUST_LOG is not set
const DEFAULT_FILTER: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(feature = "profiling")]
mod inner {
    use super::*;
    use std::path::Path;
    use tracing_chrome::{ChromeLayerBuilder, FlushGuard};

    /// Flushes the trace file when dropped
    pub struct LoggingGuard {
        _flush: Option<FlushGuard>,
    }

    /// Initialize logging, and Chrome tracing when `trace_file` is given.
    pub fn setup_logging(trace_file: Option<&Path>) -> LoggingGuard {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter());

        let (chrome_layer, flush) = match trace_file {
            Some(path) => {
                let (layer, guard) = ChromeLayerBuilder::new()
                    .file(path)
                    .include_args(true)
                    .build();
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(chrome_layer)
            .with(fmt_layer)
            .init();

        match trace_file {
            Some(path) => tracing::info!("Logging initialized, tracing to {}", path.display()),
            None => tracing::debug!("Logging initialized (no trace file requested)"),
        }

        LoggingGuard { _flush: flush }
    }
}

#[cfg(not(feature = "profiling"))]
mod inner {
    use super::*;

    pub struct LoggingGuard;

    /// Initialize logging with sensible defaults; profiling is a no-op here.
    pub fn setup_logging() -> LoggingGuard {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter());
        tracing_subscriber::registry().with(fmt_layer).init();

        tracing::debug!("Logging initialized (profiling disabled in this build)");
        LoggingGuard
    }
}

pub use inner::{LoggingGuard, setup_logging};
