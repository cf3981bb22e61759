use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SPORECART_LOG";

/// Installs the stderr subscriber. `SPORECART_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
