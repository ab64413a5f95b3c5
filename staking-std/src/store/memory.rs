//! In-memory key-value store.

use parking_lot::RwLock;
use staking_core::KvStore;
use std::collections::BTreeMap;

/// A [`KvStore`] backed by an ordered map.
///
/// Used by hosts that keep module state in memory and by tests.
#[derive(Debug, Default)]
pub struct MemStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of every entry, in key order.
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &[u8], value: &[u8]) {
        self.entries.write().insert(key.to_vec(), value.to_vec());
    }

    fn delete(&self, key: &[u8]) {
        self.entries.write().remove(key);
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .read()
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_scan_is_ordered_and_bounded() {
        let store = MemStore::new();
        store.set(&[0x21, 2], b"b");
        store.set(&[0x21, 1], b"a");
        store.set(&[0x22, 0], b"other");
        store.set(&[0x20, 9], b"before");

        let entries = store.prefix_scan(&[0x21]);
        assert_eq!(
            entries,
            vec![(vec![0x21, 1], b"a".to_vec()), (vec![0x21, 2], b"b".to_vec())]
        );
    }

    #[test]
    fn delete_and_has() {
        let store = MemStore::new();
        store.set(b"k", b"v");
        assert!(store.has(b"k"));
        store.delete(b"k");
        store.delete(b"missing");
        assert!(!store.has(b"k"));
        assert!(store.is_empty());
    }
}
