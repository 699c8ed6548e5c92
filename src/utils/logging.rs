// ============================================================================
// Logging
// Level parsing and an optional stdout subscriber
// ============================================================================

use crate::errors::{EngineError, EngineResult};
use tracing::Level;

/// Parse `trace`, `debug`, `info`, `warn` or `error` (any case).
pub fn parse_level(level: &str) -> EngineResult<Level> {
    level
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidConfig(format!("unknown log level {:?}", level)))
}

/// Install a global `fmt` subscriber capped at `level`.
///
/// # Errors
/// `InvalidConfig` if a global subscriber is already installed.
#[cfg(feature = "logging")]
pub fn init_logging(level: Level) -> EngineResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| EngineError::InvalidConfig(format!("logging already initialised: {}", e)))
}
