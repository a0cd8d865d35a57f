//! Tracing subscriber setup for binaries and tests.
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! the embedding application's call. This helper wires up the usual
//! env-filtered fmt subscriber for shells and test binaries that want one.

use tracing_subscriber::EnvFilter;

/// Installs an env-filtered fmt subscriber, if none is installed yet.
///
/// Respects `RUST_LOG`; defaults to `info` when unset. Safe to call more
/// than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init();
}
