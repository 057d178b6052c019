//! Logging setup: stdout plus a daily-rolling JSON file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the subscriber. The returned guard must stay alive for the
/// process lifetime or buffered file output is lost.
pub(crate) fn init(log_dir: &Path, log_level: &str) -> WorkerGuard {
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "monitor.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(fmt::layer())
        .with(fmt::layer().json().with_writer(file_writer).with_ansi(false))
        .init();

    guard
}
