// ============================================================================
// Order Wall Engine Library
// Deterministic limit-order matching over persistent price-ordered walls
// ============================================================================

//! # Order Wall Engine
//!
//! A deterministic limit-order matching engine for replicated state machines.
//!
//! ## Features
//!
//! - **Exact fixed-point prices** with unit-checked comparison and conversion
//! - **Order walls** kept in an ordered key-value store, keyed so that byte
//!   order is price-then-id priority
//! - **Atomic operations**: every submit, cancel and sweep commits one batch
//! - **Time-bucketed expiry** driven by an externally supplied clock
//! - **Pluggable ledger and event handlers**
//!
//! ## Example
//!
//! ```rust
//! use orderwall_engine::prelude::*;
//!
//! let ledger = InMemoryLedger::new()
//!     .with_balance("alice", Amount::new("BTC", 10))
//!     .with_balance("bob", Amount::new("ETH", 200));
//!
//! let mut engine = MatchingEngineBuilder::new("dex")
//!     .with_ledger(ledger)
//!     .build()
//!     .unwrap();
//!
//! // alice sells 10 BTC at 20 ETH per BTC
//! let ask = Price::new("20".parse().unwrap(), "ETH", "BTC").unwrap();
//! engine
//!     .submit(MsgMakeOrder::new("alice", Amount::new("BTC", 10), ask, None))
//!     .unwrap();
//!
//! // bob sells 200 ETH at 0.05 BTC per ETH and takes the whole ask
//! let bid = Price::new("0.05".parse().unwrap(), "BTC", "ETH").unwrap();
//! let execution = engine
//!     .submit(MsgMakeOrder::new("bob", Amount::new("ETH", 200), bid, None))
//!     .unwrap();
//!
//! assert!(execution.consumed);
//! assert_eq!(engine.ledger().balance(&AccountId::new("bob"), "BTC"), 10);
//! println!("{}", engine.query("orderwall/BTC|ETH").unwrap());
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod numeric;
pub mod store;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        AccountId, Amount, DenomPair, EngineConfig, Fill, Order, OrderId, Price,
    };
    pub use crate::engine::{
        create_from_config, Execution, Keeper, MatchingEngine, MatchingEngineBuilder, Msg,
        MsgMakeOrder, MsgRemoveOrder, MsgResult,
    };
    pub use crate::errors::{EngineError, EngineResult};
    pub use crate::interfaces::{
        EventHandler, InMemoryLedger, Ledger, LedgerError, LoggingEventHandler, NoOpEventHandler,
        OrderEvent, RecordingEventHandler,
    };
    pub use crate::numeric::Ratio;
    pub use crate::store::{KvRead, KvStore, MemStore};
}
