//! JSON logging on stderr.
//!
//! Ledger operations log one `info` line per committed operation, `debug` for
//! rejections and `warn` when a notification cannot be published.

use tracing_subscriber::EnvFilter;

/// Checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TOKENLEDGER_LOG";

pub const DEFAULT_FILTER: &str = "info";

/// Filter from `TOKENLEDGER_LOG`, then `RUST_LOG`, then [`DEFAULT_FILTER`].
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

pub fn init_with(directives: &str) {
    install(EnvFilter::new(directives));
}

fn install(filter: EnvFilter) {
    // stdout belongs to the host (the replay binary writes outcomes there).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
