// ============================================================================
// Ordered Key-Value Store
// Prefix-iterable storage with atomic batched writes
// ============================================================================

use crossbeam_skiplist::SkipMap;
use parking_lot::RwLock;
use std::ops::Bound;

/// One stored entry
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ascending iterator over stored entries
pub type KvIter<'a> = Box<dyn Iterator<Item = KvPair> + 'a>;

/// Read access to an ordered byte-keyed store.
pub trait KvRead {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Entries with `start <= key < end` in ascending key order; `None`
    /// leaves the range open-ended.
    fn range<'a>(&'a self, start: &[u8], end: Option<&[u8]>) -> KvIter<'a>;
}

/// A store that applies a [`WriteBatch`] as one atomic unit.
pub trait KvStore: KvRead + Send + Sync {
    fn write(&self, batch: WriteBatch);
}

// ============================================================================
// Write Batch
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Ordered list of mutations committed together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(BatchOp::Put { key, value });
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(BatchOp::Delete { key });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }
}

impl IntoIterator for WriteBatch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Skip-list backed store.
///
/// Batches are applied under the write side of `commit`; reads hold the read
/// side, so a reader never observes half of a batch.
#[derive(Default)]
pub struct MemStore {
    map: SkipMap<Vec<u8>, Vec<u8>>,
    commit: RwLock<()>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl KvRead for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let _guard = self.commit.read_recursive();
        self.map.get(key).map(|entry| entry.value().clone())
    }

    fn range<'a>(&'a self, start: &[u8], end: Option<&[u8]>) -> KvIter<'a> {
        if matches!(end, Some(end) if end <= start) {
            return Box::new(std::iter::empty());
        }

        let guard = self.commit.read_recursive();
        let bounds = (
            Bound::Included(start.to_vec()),
            end.map_or(Bound::Unbounded, |end| Bound::Excluded(end.to_vec())),
        );

        Box::new(self.map.range::<Vec<u8>, _>(bounds).map(move |entry| {
            let _held = &guard;
            (entry.key().clone(), entry.value().clone())
        }))
    }
}

impl KvStore for MemStore {
    fn write(&self, batch: WriteBatch) {
        let _guard = self.commit.write();
        for op in batch {
            match op {
                BatchOp::Put { key, value } => {
                    self.map.insert(key, value);
                },
                BatchOp::Delete { key } => {
                    self.map.remove(key.as_slice());
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(iter: KvIter<'_>) -> Vec<Vec<u8>> {
        iter.map(|(k, _)| k).collect()
    }

    #[test]
    fn test_batch_write_and_get() {
        let store = MemStore::new();
        let mut batch = WriteBatch::new();
        batch.put(b"a".to_vec(), b"1".to_vec());
        batch.put(b"b".to_vec(), b"2".to_vec());
        assert_eq!(batch.len(), 2);
        store.write(batch);

        assert_eq!(store.get(b"a"), Some(b"1".to_vec()));
        assert_eq!(store.len(), 2);

        let mut batch = WriteBatch::new();
        batch.delete(b"a".to_vec());
        store.write(batch);
        assert_eq!(store.get(b"a"), None);
    }

    #[test]
    fn test_range_is_ordered_and_bounded() {
        let store = MemStore::new();
        let mut batch = WriteBatch::new();
        for key in ["p/c", "p/a", "q/a", "p/b", "o/z"] {
            batch.put(key.as_bytes().to_vec(), Vec::new());
        }
        store.write(batch);

        assert_eq!(
            keys(store.range(b"p/", Some(b"p0".as_slice()))),
            vec![b"p/a".to_vec(), b"p/b".to_vec(), b"p/c".to_vec()]
        );
        assert_eq!(keys(store.range(b"q", None)), vec![b"q/a".to_vec()]);
        assert!(keys(store.range(b"p0", Some(b"p/".as_slice()))).is_empty());
    }

    #[test]
    fn test_read_during_iteration() {
        let store = MemStore::new();
        let mut batch = WriteBatch::new();
        batch.put(b"k1".to_vec(), b"v1".to_vec());
        batch.put(b"k2".to_vec(), b"v2".to_vec());
        store.write(batch);

        for (key, value) in store.range(b"k", None) {
            assert_eq!(store.get(&key), Some(value));
        }
    }
}
