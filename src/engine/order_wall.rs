// ============================================================================
// Order Walls
// Price-then-id ordered index of resting orders per directional pair
// ============================================================================

use super::Keeper;
use crate::domain::{DenomPair, Order, OrderId};
use crate::errors::EngineResult;
use crate::store::{decode_value, encode_value, prefix_end, KvRead};

impl<'a, S: KvRead + ?Sized> Keeper<'a, S> {
    /// Index `order` under its own pair, price and id.
    pub fn insert_order_wall_order(&mut self, order: &Order) -> EngineResult<()> {
        let key = self
            .keys
            .order_wall_key(&order.pair(), order.price.ratio, order.id)?;
        let value = encode_value(&key, &order.id)?;
        self.tx.set(key, value);
        Ok(())
    }

    /// Remove exactly the entry [`Self::insert_order_wall_order`] wrote.
    pub fn delete_order_wall_order(&mut self, order: &Order) -> EngineResult<()> {
        let key = self
            .keys
            .order_wall_key(&order.pair(), order.price.ratio, order.id)?;
        self.tx.delete(key);
        Ok(())
    }

    /// Best resting order of `pair`: lowest price, then lowest id.
    pub fn peek_order_wall_order(&self, pair: &DenomPair) -> EngineResult<Option<Order>> {
        Ok(self.best_entry(pair)?.map(|(_, order)| order))
    }

    /// Peek and drop the index entry. The primary record is left alone.
    pub fn pop_order_wall_order(&mut self, pair: &DenomPair) -> EngineResult<Option<Order>> {
        let Some((key, order)) = self.best_entry(pair)? else {
            return Ok(None);
        };
        self.tx.delete(key);
        Ok(Some(order))
    }

    /// Every resting order of `pair`, best first.
    pub fn order_wall(&self, pair: &DenomPair) -> EngineResult<Vec<Order>> {
        let mut orders = Vec::new();
        for (key, value) in self.wall_entries(pair) {
            if let Some(order) = self.resolve_entry(&key, &value)? {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    fn wall_entries(&self, pair: &DenomPair) -> crate::store::KvIter<'_> {
        let prefix = self.keys.order_wall_prefix(pair);
        let end = prefix_end(&prefix);
        self.tx.range(&prefix, end.as_deref())
    }

    fn best_entry(&self, pair: &DenomPair) -> EngineResult<Option<(Vec<u8>, Order)>> {
        for (key, value) in self.wall_entries(pair) {
            if let Some(order) = self.resolve_entry(&key, &value)? {
                return Ok(Some((key, order)));
            }
        }
        Ok(None)
    }

    /// Look up the order an index entry points at; dangling entries are
    /// skipped.
    fn resolve_entry(&self, key: &[u8], value: &[u8]) -> EngineResult<Option<Order>> {
        let id: OrderId = decode_value(key, value)?;
        let order = self.get_order(id)?;
        if order.is_none() {
            tracing::warn!(
                order_id = %id,
                key = %String::from_utf8_lossy(key),
                "order wall entry without primary record, skipping"
            );
        }
        Ok(order)
    }
}
