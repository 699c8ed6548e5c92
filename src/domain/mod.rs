// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod fill;
pub mod order;
pub mod price;

pub use config::EngineConfig;
pub use fill::Fill;
pub use order::{validate_unit, AccountId, Amount, DenomPair, Order, OrderId};
pub use price::{convert_amount, Price};
