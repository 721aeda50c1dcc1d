//! Tracing subscriber setup for the binary.
//!
//! Events go to stderr so stdout stays clean for feedback and JSON output.
//! The filter comes from `RUST_LOG`, defaulting to `info`.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Calls after the first are no-ops.
pub fn init_tracing() {
    if INITIALISED.set(()).is_err() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    // Another subscriber may already be installed by an embedding test
    // harness; keep it.
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
