// ============================================================================
// Event Handler Interface
// Defines the contract for handling order and fill events
// ============================================================================

use crate::domain::{AccountId, Amount, DenomPair, Fill, OrderId, Price};
use crate::numeric::Ratio;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Events emitted by the matching engine after an operation commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    /// Order validated, reserved and assigned an id
    OrderAccepted {
        order_id: OrderId,
        owner: AccountId,
        sell_amount: Amount,
        price: Price,
    },

    /// Incoming order crossed a resting order
    OrderMatched { fill: Fill },

    /// Order fully consumed and removed from state
    OrderFilled { order_id: OrderId },

    /// Remainder persisted into its own order wall
    OrderAddedToWall {
        order_id: OrderId,
        pair: DenomPair,
        price: Ratio,
        quantity: u64,
    },

    /// Order cancelled by its owner
    OrderCancelled { order_id: OrderId, refund: Amount },

    /// Order removed by an expiry sweep
    OrderExpired { order_id: OrderId, refund: Amount },
}

/// Event handler trait for processing matching engine events
/// Implementations can handle logging, metrics, notifications, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an order event
    fn on_event(&self, event: OrderEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        tracing::debug!(?event, "order wall event");
    }
}

/// Keeps every event in memory, in emission order
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<OrderEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<OrderEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        self.events.lock().push(event);
    }

    fn on_events(&self, events: Vec<OrderEvent>) {
        self.events.lock().extend(events);
    }
}
