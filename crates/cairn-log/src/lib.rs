//! Structured logging for the cairn workspace.
//!
//! Library crates only use the `tracing` facade; binaries call
//! [`init_logging`] once at startup to install a console subscriber with
//! uptime timestamps and module targets, filterable through `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the tracing subscriber for a binary.
///
/// `filter` is the fallback directive string used when `RUST_LOG` is unset;
/// pass `None` for the `info` default. Calling this twice panics (the global
/// subscriber can only be set once), so only binaries should call it.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or("info")));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// The default filter used when neither `RUST_LOG` nor an override is given.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}
