//! Tracing setup for the binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "QUIZ_LOG";

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new("warn,app=info,services=info,storage=info,quiz_core=info")
    })
}

/// Install the global subscriber. Logs go to stderr so quiz output stays clean.
pub fn init_logging() {
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(build_env_filter())
        .with(layer)
        .init();
}
