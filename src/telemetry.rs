use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,plant_catalog=debug";

/// Install the global fmt subscriber. `RUST_LOG` overrides the default
/// filter. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
    {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}
