//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup. Diagnostics go to stderr so stdout stays
//! reserved for the probe's status lines.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; `fallback` is used when it is unset or
/// unparseable.
pub fn init(fallback: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|e| AppError::Logger(format!("invalid log level '{fallback}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(())
}
