// ============================================================================
// Keeper
// Transactional view over the store plus the order lifecycle operations
// ============================================================================

use super::execution::Execution;
use crate::domain::{Amount, Order, OrderId};
use crate::errors::{EngineError, EngineResult};
use crate::store::{KeyLayout, KvRead, KvStore, Transaction, WriteBatch};

/// Reads and writes engine state through one [`Transaction`].
///
/// Every mutation made through a keeper stays buffered until
/// [`Keeper::commit`]; dropping the keeper discards all of it. Record access
/// lives in `orders.rs`, `order_wall.rs`, `expiration.rs` and the matching
/// loop in `execution.rs`.
pub struct Keeper<'a, S: KvRead + ?Sized> {
    pub(super) tx: Transaction<'a, S>,
    pub(super) keys: &'a KeyLayout,
}

impl<'a, S: KvRead + ?Sized> Keeper<'a, S> {
    pub fn new(store: &'a S, keys: &'a KeyLayout) -> Self {
        Self {
            tx: Transaction::new(store),
            keys,
        }
    }

    pub fn keys(&self) -> &KeyLayout {
        self.keys
    }

    /// Buffered mutations as one batch
    pub fn into_batch(self) -> WriteBatch {
        self.tx.into_batch()
    }

    // ========================================================================
    // Order Lifecycle
    // ========================================================================

    /// Persist a freshly numbered order, match it against the opposing wall
    /// and rest whatever is left.
    ///
    /// # Errors
    /// `InvalidPriceRange` if the price is outside the sortable window.
    pub fn add_new_order(&mut self, order: Order) -> EngineResult<Execution> {
        if !order.price.is_valid() {
            return Err(EngineError::InvalidPriceRange {
                ratio: order.price.ratio,
            });
        }

        self.set_order(&order)?;
        let execution = self.execute_order_against_order_wall(order)?;

        if !execution.consumed {
            let remainder = &execution.remainder;
            self.insert_order_wall_order(remainder)?;
            if let Some(at) = remainder.expiration {
                self.insert_expiration_queue(remainder.id, &at)?;
            }
        }

        Ok(execution)
    }

    /// Delete an order's primary record and its wall entry.
    ///
    /// Returns the removed order so the caller can refund it; `None` if no
    /// such order exists.
    pub fn remove_order(&mut self, id: OrderId) -> EngineResult<Option<Order>> {
        let Some(order) = self.get_order(id)? else {
            return Ok(None);
        };

        self.delete_order_wall_order(&order)?;
        self.delete_order(id);
        Ok(Some(order))
    }

    /// Set the remaining sell amount of an order.
    ///
    /// No-op when the order is absent or the unit differs. A zero amount
    /// removes the order; anything else is stored in place and the wall
    /// entry stays where it is.
    pub fn decrease_order_bid_amount(&mut self, id: OrderId, amount: Amount) -> EngineResult<()> {
        let Some(mut order) = self.get_order(id)? else {
            return Ok(());
        };
        if !order.sell_amount.same_unit(&amount) {
            return Ok(());
        }

        if amount.is_zero() {
            self.remove_order(id)?;
            return Ok(());
        }

        order.sell_amount = amount;
        self.set_order(&order)
    }
}

impl<'a, S: KvStore + ?Sized> Keeper<'a, S> {
    /// Apply every buffered mutation atomically.
    pub fn commit(self) -> usize {
        self.tx.commit()
    }
}
