//! Logging configuration.
//!
//! Inside the function runtime logs go to stdout without colours or
//! timestamps, since the log sink adds its own. Elsewhere they go to stderr
//! so that `invoke` output on stdout stays machine-readable.

use std::ffi::OsString;
use tracing_subscriber::EnvFilter;

/// Environment variable set by the function runtime.
const FUNCTION_NAME_VAR: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Initializes the global tracing subscriber.
///
/// Honours `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if in_function_runtime() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Returns true when running inside the function runtime.
pub fn in_function_runtime() -> bool {
    is_function_runtime(std::env::var_os(FUNCTION_NAME_VAR))
}

fn is_function_runtime(function_name: Option<OsString>) -> bool {
    function_name.is_some_and(|name| !name.is_empty())
}
