/// Tracing setup for the binary.
use std::env;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives, overriding the default level.
const LOG_ENV: &str = "CMDTREE_LOG";
/// `json` for structured output, anything else for compact text.
const LOG_FORMAT_ENV: &str = "CMDTREE_LOG_FORMAT";

/// Install a stderr subscriber.
///
/// The filter comes from `CMDTREE_LOG`, falling back to `warn` (`debug` when
/// `debug` is set).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(debug: bool) -> anyhow::Result<()> {
    let fallback = if debug { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_default();
    let registry = tracing_subscriber::registry().with(env_filter);

    if format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
