//! Global `tracing` subscriber installation
//!
//! `RUST_LOG` takes precedence over the configured level. Output is either
//! human-readable or one JSON object per line.

use slotwise_domain::{LoggingConfig, Result, SlotwiseError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `config.level`.
///
/// # Errors
/// `SlotwiseError::Config` when the configured level is not a valid filter
/// directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            SlotwiseError::Config(format!("Invalid log level '{}': {}", config.level, e))
        }),
    }
}

/// Install the global subscriber. Calling it again is a no-op.
///
/// # Errors
/// `SlotwiseError::Config` for an invalid log level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    match installed {
        Ok(()) => tracing::debug!(level = %config.level, json = config.json, "Tracing initialised"),
        Err(_) => tracing::debug!("Tracing subscriber already installed"),
    }
    Ok(())
}
