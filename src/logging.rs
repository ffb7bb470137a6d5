//! Log output for the CLI frontend.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::{MidoriError, Result};

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| MidoriError::config(format!("invalid log level '{}': {}", level, e)))?,
    };

    // stdout carries generated code, so logs go to stderr
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| MidoriError::config(format!("failed to initialize logging: {}", e)))?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "midori starting");
    Ok(())
}
