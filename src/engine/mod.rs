// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod execution;
mod expiration;
mod handler;
mod keeper;
mod matching_engine;
mod order_wall;
mod orders;
mod querier;

pub mod factory;

pub use execution::Execution;
pub use factory::{create_from_config, MatchingEngineBuilder};
pub use handler::{Msg, MsgMakeOrder, MsgRemoveOrder, MsgResult};
pub use keeper::Keeper;
pub use matching_engine::MatchingEngine;
pub use querier::{query, QUERY_ORDER, QUERY_ORDER_WALL};
