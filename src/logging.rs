use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `infracheck=debug`.
pub const LOG_ENV: &str = "INFRACHECK_LOG";

/// Installs a stderr subscriber. Logging stays off unless `INFRACHECK_LOG`
/// is set, so stdout and stderr keep their JSON-only contract by default.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
