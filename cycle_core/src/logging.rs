//! Logging setup shared by the library's binaries.
//!
//! Events go to stderr so they never mix with projection output or `--json`
//! documents on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default level for the command-line tool: quiet unless something is wrong
pub const CLI_DEFAULT_LEVEL: &str = "warn";

/// Initialize logging for the command-line tool
pub fn init() {
    init_with_level(CLI_DEFAULT_LEVEL)
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (debug, info, warn, error)
///
/// `RUST_LOG` still overrides it.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
