use crate::error::ConfigError;
use std::sync::Once;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: Once = Once::new();

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber once per process.
///
/// The filter comes from `LOG_LEVEL` and defaults to `info`.
pub fn init_tracing(format: LogFormat) {
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(filter);

        let result = match format {
            LogFormat::Text => registry
                .with(fmt::layer().with_target(true).with_line_number(true))
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_timer(UtcTime::rfc_3339())
                        .with_target(false)
                        .flatten_event(true)
                        .with_thread_ids(true),
                )
                .try_init(),
        };

        match result {
            Ok(()) => tracing::debug!("Tracing initialized successfully"),
            Err(e) => eprintln!("Tracing subscriber already set: {e}"),
        }
    });
}

/// Validates a log level directive without installing anything
pub fn parse_log_level(level: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(level).map_err(|e| ConfigError::SetLogLevelError(e.to_string()))
}
