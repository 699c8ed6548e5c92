// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod ledger;

pub use event_handler::{
    EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent, RecordingEventHandler,
};
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
