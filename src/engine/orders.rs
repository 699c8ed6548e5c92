// ============================================================================
// Order Records
// Primary order storage and the order id counter
// ============================================================================

use super::Keeper;
use crate::domain::{Order, OrderId};
use crate::errors::EngineResult;
use crate::numeric::NumericError;
use crate::store::{decode_value, encode_value, KvRead};

impl<'a, S: KvRead + ?Sized> Keeper<'a, S> {
    pub fn get_order(&self, id: OrderId) -> EngineResult<Option<Order>> {
        let key = self.keys.order_key(id);
        self.tx
            .get(&key)
            .map(|bytes| decode_value(&key, &bytes))
            .transpose()
    }

    pub fn set_order(&mut self, order: &Order) -> EngineResult<()> {
        let key = self.keys.order_key(order.id);
        let value = encode_value(&key, order)?;
        self.tx.set(key, value);
        Ok(())
    }

    pub fn delete_order(&mut self, id: OrderId) {
        self.tx.delete(self.keys.order_key(id));
    }

    /// Last id handed out; zero before the first order.
    pub fn last_order_id(&self) -> EngineResult<OrderId> {
        let key = self.keys.last_order_id_key();
        match self.tx.get(&key) {
            Some(bytes) => decode_value(&key, &bytes),
            None => Ok(OrderId::new(0)),
        }
    }

    fn set_last_order_id(&mut self, id: OrderId) -> EngineResult<()> {
        let key = self.keys.last_order_id_key();
        let value = encode_value(&key, &id)?;
        self.tx.set(key, value);
        Ok(())
    }

    /// Increment the counter and return the new id. The first id is 1.
    pub fn next_order_id(&mut self) -> EngineResult<OrderId> {
        let next = self
            .last_order_id()?
            .value()
            .checked_add(1)
            .map(OrderId::new)
            .ok_or(NumericError::Overflow)?;
        self.set_last_order_id(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::keeper::test_support::order;
    use super::*;
    use crate::errors::EngineError;
    use crate::store::{KeyLayout, KvStore, MemStore, WriteBatch};

    #[test]
    fn test_order_round_trip() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);

        let o = order(7, "alice", ("BTC", 10), "0.5", "ETH");
        keeper.set_order(&o).unwrap();
        assert_eq!(keeper.get_order(o.id).unwrap(), Some(o.clone()));

        keeper.delete_order(o.id);
        assert_eq!(keeper.get_order(o.id).unwrap(), None);
    }

    #[test]
    fn test_next_order_id_is_monotonic() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");

        let mut keeper = Keeper::new(&store, &keys);
        assert_eq!(keeper.last_order_id().unwrap(), OrderId::new(0));
        assert_eq!(keeper.next_order_id().unwrap(), OrderId::new(1));
        assert_eq!(keeper.next_order_id().unwrap(), OrderId::new(2));
        keeper.commit();

        let mut keeper = Keeper::new(&store, &keys);
        assert_eq!(keeper.last_order_id().unwrap(), OrderId::new(2));
        assert_eq!(keeper.next_order_id().unwrap(), OrderId::new(3));
    }

    #[test]
    fn test_next_order_id_exhausted() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut keeper = Keeper::new(&store, &keys);
        keeper.set_last_order_id(OrderId::new(i64::MAX)).unwrap();

        assert_eq!(
            keeper.next_order_id(),
            Err(EngineError::Numeric(NumericError::Overflow))
        );
        assert_eq!(keeper.last_order_id().unwrap(), OrderId::new(i64::MAX));
    }

    #[test]
    fn test_corrupted_order_is_fatal() {
        let store = MemStore::new();
        let keys = KeyLayout::new("dex");
        let mut batch = WriteBatch::new();
        batch.put(keys.order_key(OrderId::new(1)), vec![0xff]);
        store.write(batch);

        let keeper = Keeper::new(&store, &keys);
        let err = keeper.get_order(OrderId::new(1)).unwrap_err();
        assert!(matches!(err, EngineError::Corruption { .. }));
        assert!(err.is_fatal());
    }
}
