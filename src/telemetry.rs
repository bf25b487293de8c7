// src/telemetry.rs
// =============================================================================
// Logging setup. Everything goes to stderr so `--json` output on stdout can
// be piped straight into another tool.
//
// RUST_LOG overrides the default filter, e.g. RUST_LOG=vidcrawl=debug
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vidcrawl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
