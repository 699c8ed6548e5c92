// ============================================================================
// Utilities Module
// Logging setup shared by demos, benches and embedding hosts
// ============================================================================

mod logging;

#[cfg(feature = "logging")]
pub use logging::init_logging;
pub use logging::parse_level;
