//! Diagnostic logging setup

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `cashflow=debug`
pub const LOG_ENV: &str = "CASHFLOW_LOG";

const DEFAULT_FILTER: &str = "cashflow=warn";

/// Install the global tracing subscriber
///
/// Logs go to stderr so report output on stdout stays clean. Safe to call
/// more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed by an embedding program wins
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
