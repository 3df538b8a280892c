// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber
// Level comes from RUST_LOG
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the logging system
///
/// # Environment
/// - RUST_LOG: filter directive (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=shipment_import=trace
///
/// # Example
/// ```no_run
/// use shipment_import::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Structured JSON output, for running the importer under a log collector
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).json().init();
}

/// Logging for tests (debug level, captured by the test harness)
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
