//! Diagnostic logging setup

use anyhow::anyhow;
use console::Term;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "WINSTALL_LOG";

/// Default filter when `WINSTALL_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global tracing subscriber.
///
/// Log lines go to stderr so they never mix with verbose output on stdout.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(Term::stderr().features().colors_supported())
        .try_init()
        .map_err(|err| anyhow!("failed to initialise logging: {}", err))
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
