// ============================================================================
// Store Transaction
// Write-buffering overlay committed as one batch
// ============================================================================

use super::kv::{KvIter, KvPair, KvRead, KvStore, WriteBatch};
use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::ops::Bound;

/// Buffers writes over a base store.
///
/// Reads observe the buffered writes. Nothing reaches the base store until
/// [`Transaction::commit`], which hands every mutation over as a single
/// [`WriteBatch`]; dropping the transaction discards them.
pub struct Transaction<'s, S: KvRead + ?Sized> {
    base: &'s S,
    /// `None` marks a deletion
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'s, S: KvRead + ?Sized> Transaction<'s, S> {
    pub fn new(base: &'s S) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.pending.insert(key, Some(value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.pending.insert(key, None);
    }

    /// Whether any write is buffered
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Buffered writes in key order
    pub fn into_batch(self) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for (key, value) in self.pending {
            match value {
                Some(value) => batch.put(key, value),
                None => batch.delete(key),
            }
        }
        batch
    }
}

impl<'s, S: KvStore + ?Sized> Transaction<'s, S> {
    /// Apply every buffered write to the base store atomically.
    pub fn commit(self) -> usize {
        let base = self.base;
        let batch = self.into_batch();
        let applied = batch.len();
        if applied > 0 {
            base.write(batch);
        }
        applied
    }
}

impl<'s, S: KvRead + ?Sized> KvRead for Transaction<'s, S> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(value) => value.clone(),
            None => self.base.get(key),
        }
    }

    fn range<'a>(&'a self, start: &[u8], end: Option<&[u8]>) -> KvIter<'a> {
        if matches!(end, Some(end) if end <= start) {
            return Box::new(std::iter::empty());
        }

        let upper = end.map_or(Bound::Unbounded, Bound::Excluded);
        let pending = self
            .pending
            .range::<[u8], _>((Bound::Included(start), upper))
            .peekable();

        Box::new(MergedRange {
            base: self.base.range(start, end).peekable(),
            pending,
        })
    }
}

/// Merges base entries with buffered writes; buffered writes win on equal
/// keys and deletions hide base entries.
struct MergedRange<'a> {
    base: Peekable<KvIter<'a>>,
    pending: Peekable<btree_map::Range<'a, Vec<u8>, Option<Vec<u8>>>>,
}

impl Iterator for MergedRange<'_> {
    type Item = KvPair;

    fn next(&mut self) -> Option<KvPair> {
        loop {
            let order = match (self.base.peek(), self.pending.peek()) {
                (None, None) => return None,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some((base_key, _)), Some((pending_key, _))) => base_key.cmp(*pending_key),
            };

            match order {
                Ordering::Less => return self.base.next(),
                Ordering::Equal => {
                    self.base.next();
                },
                Ordering::Greater => {},
            }

            if let Some((key, Some(value))) = self.pending.next() {
                return Some((key.clone(), value.clone()));
            }
        }
    }
}
