//! Tracing setup.
//!
//! Logs go to stderr. The default level is `info` (`debug` with `--verbose`);
//! `RUST_LOG` directives still apply on top. `json` switches to structured
//! output for CI log collectors (`LOG_FORMAT=json`).

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber. Call once, before any logging.
pub fn init_tracing(verbose: bool, json: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    }
}
