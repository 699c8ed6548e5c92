// ============================================================================
// Matching Engine
// Submit, cancel and expiry sweep settled against a ledger
// ============================================================================

use super::execution::Execution;
use super::handler::{Msg, MsgMakeOrder, MsgRemoveOrder, MsgResult};
use super::{querier, Keeper};
use crate::domain::{DenomPair, EngineConfig, Order, OrderId};
use crate::errors::{EngineError, EngineResult};
use crate::interfaces::{EventHandler, InMemoryLedger, Ledger, OrderEvent};
use crate::store::{KeyLayout, KvStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Deterministic order-wall matching engine.
///
/// Operations run one at a time (`&mut self`). Each one buffers its store
/// mutations in a single transaction and commits them as one batch; ledger
/// credits and events are applied only after that commit succeeds.
pub struct MatchingEngine<L: Ledger = InMemoryLedger> {
    config: EngineConfig,

    /// Key builder for `config.namespace`
    keys: KeyLayout,

    /// Ordered store holding orders, walls and the expiration queue
    store: Arc<dyn KvStore>,

    /// Balances debited on submit and credited on fills and refunds
    ledger: L,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,
}

impl<L: Ledger> MatchingEngine<L> {
    /// Create a new matching engine
    ///
    /// # Errors
    /// `InvalidConfig` if `config` does not validate.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn KvStore>,
        ledger: L,
        event_handler: Arc<dyn EventHandler>,
    ) -> EngineResult<Self> {
        config.validate()?;

        Ok(Self {
            keys: KeyLayout::new(config.namespace.clone()),
            config,
            store,
            ledger,
            event_handler,
        })
    }

    // ========================================================================
    // State-changing operations
    // ========================================================================

    /// Reserve the sell amount, match the order and rest any remainder.
    ///
    /// On error nothing is written and the ledger is left as it was.
    pub fn submit(&mut self, msg: MsgMakeOrder) -> EngineResult<Execution> {
        msg.validate_basic()?;
        self.config.validate_unit(&msg.sell_amount.unit)?;
        self.config.validate_unit(&msg.price.numerator_unit)?;

        self.ledger.debit(&msg.owner, &msg.sell_amount)?;

        let execution = match self.place_order(&msg) {
            Ok(execution) => execution,
            Err(err) => {
                self.ledger.credit(&msg.owner, &msg.sell_amount);
                log_failure(&err, "order not placed, reserve returned");
                return Err(err);
            },
        };

        for (account, amount) in execution.payouts() {
            self.ledger.credit(&account, &amount);
        }

        tracing::info!(
            order_id = %execution.order_id(),
            owner = %msg.owner,
            fills = execution.fills.len(),
            consumed = execution.consumed,
            "order placed"
        );

        let mut events = Vec::with_capacity(execution.fills.len() * 2 + 2);
        events.push(OrderEvent::OrderAccepted {
            order_id: execution.order_id(),
            owner: msg.owner,
            sell_amount: msg.sell_amount,
            price: msg.price,
        });
        for fill in &execution.fills {
            events.push(OrderEvent::OrderMatched { fill: fill.clone() });
            if fill.maker_filled {
                events.push(OrderEvent::OrderFilled {
                    order_id: fill.maker_order_id,
                });
            }
        }
        if execution.consumed {
            events.push(OrderEvent::OrderFilled {
                order_id: execution.order_id(),
            });
        } else {
            let remainder = &execution.remainder;
            events.push(OrderEvent::OrderAddedToWall {
                order_id: remainder.id,
                pair: remainder.pair(),
                price: remainder.price.ratio,
                quantity: remainder.sell_amount.quantity,
            });
        }
        self.event_handler.on_events(events);

        Ok(execution)
    }

    /// Remove an order owned by `msg.owner` and refund its remainder.
    ///
    /// # Errors
    /// `OrderNotFound` if there is no such order, `Unauthorized` if someone
    /// else owns it.
    pub fn cancel(&mut self, msg: MsgRemoveOrder) -> EngineResult<Order> {
        msg.validate_basic()?;

        let removed = self.remove_owned_order(&msg)?;
        self.ledger.credit(&removed.owner, &removed.sell_amount);

        tracing::info!(
            order_id = %removed.id,
            refund = %removed.sell_amount,
            "order cancelled"
        );

        self.event_handler.on_event(OrderEvent::OrderCancelled {
            order_id: removed.id,
            refund: removed.sell_amount.clone(),
        });

        Ok(removed)
    }

    /// Remove every order whose expiration is at or before `now` and refund
    /// the remainders. Ids that no longer resolve are skipped.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> EngineResult<Vec<Order>> {
        let expired = self.remove_expired(&now)?;

        let mut events = Vec::with_capacity(expired.len());
        for order in &expired {
            self.ledger.credit(&order.owner, &order.sell_amount);
            events.push(OrderEvent::OrderExpired {
                order_id: order.id,
                refund: order.sell_amount.clone(),
            });
        }

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), %now, "expired orders swept");
        }
        self.event_handler.on_events(events);

        Ok(expired)
    }

    /// Dispatch a message to its operation.
    pub fn handle(&mut self, msg: Msg) -> EngineResult<MsgResult> {
        tracing::debug!(kind = msg.kind(), "handling message");

        match msg {
            Msg::MakeOrder(msg) => self.submit(msg).map(MsgResult::OrderMade),
            Msg::RemoveOrder(msg) => self.cancel(msg).map(MsgResult::OrderRemoved),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn get_order(&self, id: OrderId) -> EngineResult<Order> {
        self.keeper()
            .get_order(id)?
            .ok_or(EngineError::OrderNotFound { order_id: id.value() })
    }

    /// Resting orders of `pair`, best first
    pub fn get_order_wall(&self, pair: &DenomPair) -> EngineResult<Vec<Order>> {
        self.keeper().order_wall(pair)
    }

    /// Answer `order/{id}` or `orderwall/{sell}|{buy}` as pretty JSON.
    pub fn query(&self, path: &str) -> EngineResult<String> {
        querier::query(&self.keeper(), path)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn store(&self) -> Arc<dyn KvStore> {
        Arc::clone(&self.store)
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn keeper(&self) -> Keeper<'_, dyn KvStore> {
        Keeper::new(&*self.store, &self.keys)
    }

    fn place_order(&self, msg: &MsgMakeOrder) -> EngineResult<Execution> {
        let mut keeper = self.keeper();
        let id = keeper.next_order_id()?;
        let order = Order::new(
            id,
            msg.owner.clone(),
            msg.sell_amount.clone(),
            msg.price.clone(),
            msg.expiration,
        )?;

        let execution = keeper.add_new_order(order)?;
        keeper.commit();
        Ok(execution)
    }

    fn remove_owned_order(&self, msg: &MsgRemoveOrder) -> EngineResult<Order> {
        let mut keeper = self.keeper();
        let order = keeper
            .get_order(msg.order_id)?
            .ok_or(EngineError::OrderNotFound {
                order_id: msg.order_id.value(),
            })?;

        if order.owner != msg.owner {
            return Err(EngineError::Unauthorized {
                account: msg.owner.to_string(),
                order_id: msg.order_id.value(),
            });
        }

        keeper.remove_order(order.id)?;
        keeper.commit();
        Ok(order)
    }

    fn remove_expired(&self, now: &DateTime<Utc>) -> EngineResult<Vec<Order>> {
        let mut keeper = self.keeper();
        let ids = keeper.get_all_expired_orders_queue(now)?;

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            match keeper.remove_order(id)? {
                Some(order) => removed.push(order),
                None => tracing::debug!(order_id = %id, "expired order already gone"),
            }
        }

        keeper.commit();
        Ok(removed)
    }
}

fn log_failure(err: &EngineError, message: &str) {
    if err.is_fatal() {
        tracing::error!(error = %err, "{}", message);
    } else {
        tracing::warn!(error = %err, "{}", message);
    }
}
