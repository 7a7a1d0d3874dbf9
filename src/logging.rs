//! Tracing subscriber setup for binaries and tests embedding the exporter.
//!
//! The library itself only emits `tracing` events; it never installs a subscriber.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than once is harmless; later
/// calls leave the first subscriber in place.
pub fn init_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
