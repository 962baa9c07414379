//! Diagnostics for the facility itself
//!
//! Bound types write their own lines through [`crate::sink::SinkManager`].
//! Events about the facility (handle creation, file sink degradation) go
//! through `tracing`, and host applications can surface them with [`init`].

use crate::config::{default_log_path, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the diagnostics subscriber
///
/// Sets up tracing with:
/// - stderr output
/// - Configurable level via config or RUST_LOG env var
///
/// Returns `false` if another global subscriber was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %config.level, "diagnostics initialized");
    }
    installed
}

/// Initialize logging for tests (logs to the test writer)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Returns the default log file path
pub fn log_file_path() -> PathBuf {
    default_log_path()
}
