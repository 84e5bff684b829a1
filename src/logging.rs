//! Structured logging setup for the binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the process. Logs go to stderr so stdout carries nothing but TAP.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to `level`.
/// Does nothing if a global subscriber is already set.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
