//! Structured debug logging system

use crate::DiagnosticsError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "info";

/// Default filter in debug mode when `RUST_LOG` is not set
const DEBUG_FILTER: &str = "videomeet=debug,videomeet_media=debug,info";

/// Debug logger for structured logging
#[derive(Debug, Default)]
pub struct DebugLogger;

impl DebugLogger {
    /// Create new debug logger
    pub fn new() -> Self {
        Self
    }

    /// Initialize logging system.
    ///
    /// `RUST_LOG` wins when set; otherwise `debug` selects between the
    /// verbose and the default filter.
    pub fn init_logging(debug: bool) -> Result<(), DiagnosticsError> {
        let fallback = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        Self::install(filter)
    }

    /// Initialize logging with an explicit filter directive, ignoring `RUST_LOG`
    pub fn init_with_filter(directives: &str) -> Result<(), DiagnosticsError> {
        let filter = EnvFilter::try_new(directives).map_err(|e| DiagnosticsError::LoggingInit {
            reason: e.to_string(),
        })?;
        Self::install(filter)
    }

    fn install(filter: EnvFilter) -> Result<(), DiagnosticsError> {
        let directives = filter.to_string();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .map_err(|e| DiagnosticsError::LoggingInit {
                reason: e.to_string(),
            })?;
        debug!("📝 Logging initialized with filter {}", directives);
        Ok(())
    }
}
