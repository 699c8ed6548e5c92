// ============================================================================
// Expiration Queue
// Time-bucketed order ids due for removal
// ============================================================================

use super::Keeper;
use crate::domain::OrderId;
use crate::errors::EngineResult;
use crate::store::{decode_value, encode_value, KvRead};
use chrono::{DateTime, Utc};

impl<'a, S: KvRead + ?Sized> Keeper<'a, S> {
    /// Ids expiring at exactly `at`, in insertion order.
    pub fn expiration_time_slice(&self, at: &DateTime<Utc>) -> EngineResult<Vec<OrderId>> {
        let key = self.keys.expiration_key(at);
        match self.tx.get(&key) {
            Some(bytes) => decode_value(&key, &bytes),
            None => Ok(Vec::new()),
        }
    }

    fn set_expiration_time_slice(
        &mut self,
        at: &DateTime<Utc>,
        ids: &[OrderId],
    ) -> EngineResult<()> {
        let key = self.keys.expiration_key(at);
        let value = encode_value(&key, &ids)?;
        self.tx.set(key, value);
        Ok(())
    }

    /// Append `id` to the bucket at `at`, creating it if needed.
    pub fn insert_expiration_queue(&mut self, id: OrderId, at: &DateTime<Utc>) -> EngineResult<()> {
        let mut slice = self.expiration_time_slice(at)?;
        slice.push(id);
        self.set_expiration_time_slice(at, &slice)
    }

    /// Concatenate every bucket at or before `now`, oldest first, and
    /// delete the buckets.
    pub fn get_all_expired_orders_queue(&mut self, now: &DateTime<Utc>) -> EngineResult<Vec<OrderId>> {
        let start = self.keys.expiration_prefix();
        let end = self.keys.expiration_end_inclusive(now);
        let buckets: Vec<_> = self.tx.range(&start, Some(end.as_slice())).collect();

        let mut expired = Vec::new();
        for (key, value) in buckets {
            let slice: Vec<OrderId> = decode_value(&key, &value)?;
            expired.extend(slice);
            self.tx.delete(key);
        }
        Ok(expired)
    }
}
