//! Structured logging setup.
//!
//! Controlled by `RUST_LOG`; the default shows warnings and errors only,
//! which keeps the one-line-per-skipped-unit contract intact without
//! drowning batch runs in per-class detail.
//!
//! ```bash
//! # phase-level progress
//! RUST_LOG=info stereomap annotate archive.xml -o out.xml
//! # per-class detail
//! RUST_LOG=stereomap=debug stereomap annotate archive.xml -o out.xml
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialises the global subscriber. Call once at startup; later calls
/// are ignored so tests can set up logging freely.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
