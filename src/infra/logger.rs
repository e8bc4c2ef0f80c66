// src/infra/logger.rs — Structured logging with tracing
//
// Logs go to stderr so they never tear the TUI or pollute piped stdout.
// Filter precedence: PULSEDECK_LOG, then RUST_LOG, then `level`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(level: &str) {
    let filter = std::env::var("PULSEDECK_LOG")
        .ok()
        .and_then(|spec| spec.parse::<EnvFilter>().ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
