// ============================================================================
// Key Layout
// Byte-ordered keys for orders, order walls and the expiration queue
// ============================================================================

use crate::domain::order::KEY_SEPARATOR;
use crate::domain::{DenomPair, OrderId};
use crate::errors::EngineResult;
use crate::numeric::{Ratio, SORTABLE_KEY_LEN};
use chrono::{DateTime, Utc};

const ORDERS: &str = "orders";
const LAST_ORDER_ID: &str = "lastOrderID";
const ORDER_WALLS: &str = "orderwalls";
const EXPIRATION_QUEUE: &str = "expirationQueue";

const SEPARATOR: u8 = KEY_SEPARATOR as u8;

/// Byte length of [`encode_timestamp`]
pub const TIMESTAMP_KEY_LEN: usize = 12;

/// Builds every key the engine persists, under one namespace.
///
/// ```text
/// {ns}/orders/{id}
/// {ns}/lastOrderID
/// {ns}/orderwalls/{sell}|{buy}/{ratio}/{id}
/// {ns}/expirationQueue/{timestamp}
/// ```
///
/// Ids and timestamps are fixed-width big-endian, ratios use
/// [`Ratio::sortable_bytes`], so byte order equals logical order inside
/// each prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    namespace: String,
}

impl KeyLayout {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn segment(&self, name: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.namespace.len() + name.len() + 2);
        key.extend_from_slice(self.namespace.as_bytes());
        key.push(SEPARATOR);
        key.extend_from_slice(name.as_bytes());
        key
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub fn orders_prefix(&self) -> Vec<u8> {
        let mut key = self.segment(ORDERS);
        key.push(SEPARATOR);
        key
    }

    pub fn order_key(&self, id: OrderId) -> Vec<u8> {
        let mut key = self.orders_prefix();
        key.extend_from_slice(&id.to_sortable_bytes());
        key
    }

    pub fn last_order_id_key(&self) -> Vec<u8> {
        self.segment(LAST_ORDER_ID)
    }

    // ========================================================================
    // Order Walls
    // ========================================================================

    /// Prefix shared by every entry of one wall, trailing separator
    /// included so `A|B` never matches `A|BC`.
    pub fn order_wall_prefix(&self, pair: &DenomPair) -> Vec<u8> {
        let mut key = self.segment(ORDER_WALLS);
        key.push(SEPARATOR);
        key.extend_from_slice(pair.to_string().as_bytes());
        key.push(SEPARATOR);
        key
    }

    pub fn order_wall_key(
        &self,
        pair: &DenomPair,
        ratio: Ratio,
        id: OrderId,
    ) -> EngineResult<Vec<u8>> {
        let mut key = self.order_wall_prefix(pair);
        key.extend_from_slice(&ratio.sortable_bytes()?);
        key.push(SEPARATOR);
        key.extend_from_slice(&id.to_sortable_bytes());
        Ok(key)
    }

    /// Split an order-wall key back into its ratio and order id.
    pub fn parse_order_wall_key(&self, pair: &DenomPair, key: &[u8]) -> Option<(Ratio, OrderId)> {
        let prefix = self.order_wall_prefix(pair);
        let rest = key.strip_prefix(prefix.as_slice())?;
        if rest.len() != SORTABLE_KEY_LEN + 1 + 8 || rest[SORTABLE_KEY_LEN] != SEPARATOR {
            return None;
        }
        let ratio = Ratio::from_sortable_bytes(&rest[..SORTABLE_KEY_LEN]).ok()?;
        let id = OrderId::from_sortable_bytes(&rest[SORTABLE_KEY_LEN + 1..])?;
        Some((ratio, id))
    }

    // ========================================================================
    // Expiration Queue
    // ========================================================================

    pub fn expiration_prefix(&self) -> Vec<u8> {
        let mut key = self.segment(EXPIRATION_QUEUE);
        key.push(SEPARATOR);
        key
    }

    pub fn expiration_key(&self, at: &DateTime<Utc>) -> Vec<u8> {
        let mut key = self.expiration_prefix();
        key.extend_from_slice(&encode_timestamp(at));
        key
    }

    /// Exclusive upper bound covering every bucket at or before `at`.
    pub fn expiration_end_inclusive(&self, at: &DateTime<Utc>) -> Vec<u8> {
        let mut key = self.expiration_key(at);
        key.push(0x00);
        key
    }
}

// ============================================================================
// Timestamp Encoding
// ============================================================================

/// Sign-flipped big-endian seconds followed by big-endian nanoseconds;
/// byte order equals chronological order, pre-epoch instants included.
pub fn encode_timestamp(at: &DateTime<Utc>) -> [u8; TIMESTAMP_KEY_LEN] {
    let secs = (at.timestamp() as u64) ^ (1 << 63);
    let mut buf = [0u8; TIMESTAMP_KEY_LEN];
    buf[..8].copy_from_slice(&secs.to_be_bytes());
    buf[8..].copy_from_slice(&at.timestamp_subsec_nanos().to_be_bytes());
    buf
}

pub fn decode_timestamp(bytes: &[u8]) -> Option<DateTime<Utc>> {
    let secs: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
    let nanos: [u8; 4] = bytes.get(8..TIMESTAMP_KEY_LEN)?.try_into().ok()?;
    if bytes.len() != TIMESTAMP_KEY_LEN {
        return None;
    }
    let secs = (u64::from_be_bytes(secs) ^ (1 << 63)) as i64;
    DateTime::from_timestamp(secs, u32::from_be_bytes(nanos))
}

/// Smallest key greater than every key starting with `prefix`, or `None`
/// when no such key exists (all bytes `0xff`).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
