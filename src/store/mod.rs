// ============================================================================
// Storage Module
// Ordered key-value persistence for orders and order walls
// ============================================================================

pub mod keys;
pub mod kv;
pub mod transaction;

pub use keys::{decode_timestamp, encode_timestamp, prefix_end, KeyLayout};
pub use kv::{BatchOp, KvIter, KvPair, KvRead, KvStore, MemStore, WriteBatch};
pub use transaction::Transaction;

use crate::errors::{EngineError, EngineResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a record for storage under `key`.
pub(crate) fn encode_value<T: Serialize>(key: &[u8], value: &T) -> EngineResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| {
        EngineError::Serialization(format!("{}: {}", String::from_utf8_lossy(key), e))
    })
}

/// Deserialize a record read from `key`.
pub(crate) fn decode_value<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> EngineResult<T> {
    bincode::deserialize(bytes).map_err(|e| EngineError::corruption(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderId;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refused"))
        }
    }

    #[test]
    fn test_encode_failure_is_not_corruption() {
        let err = encode_value(b"dex/orders/x", &Unencodable).unwrap_err();
        assert!(matches!(err, EngineError::Serialization(ref msg) if msg.contains("refused")));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_decode_failure_is_corruption() {
        let err = decode_value::<OrderId>(b"dex/lastOrderID", &[1, 2]).unwrap_err();
        assert!(matches!(err, EngineError::Corruption { .. }));
        assert!(err.is_fatal());
    }

}
