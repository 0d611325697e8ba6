use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber. Safe to call once at startup;
/// `RUST_LOG` controls filtering and defaults to `info`.
pub fn init_telemetry() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
