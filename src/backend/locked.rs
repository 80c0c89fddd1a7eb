use hashbrown::hash_map::{DefaultHashBuilder, HashMap};
use parking_lot::RwLock;

use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use super::Backend;
use crate::entry::CacheEntry;

/// A single map behind one read/write lock.
///
/// Readers share the lock, any write takes it exclusively for the duration of that one write.
pub struct LockedMap<K, V, S = DefaultHashBuilder> {
    table: RwLock<HashMap<K, CacheEntry<V>, S>>,
}

impl<K, V> LockedMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for LockedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LockedMap<K, V, S> {
    pub fn with_hasher(build_hasher: S) -> Self {
        LockedMap {
            table: RwLock::new(HashMap::with_hasher(build_hasher)),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        LockedMap {
            table: RwLock::new(HashMap::with_capacity_and_hasher(capacity, build_hasher)),
        }
    }
}

impl<K, V, S> Backend<K, V> for LockedMap<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        self.table.read().get(key).cloned()
    }

    fn insert(&self, key: K, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        self.table.write().insert(key, entry)
    }

    fn remove(&self, key: &K) -> Option<CacheEntry<V>> {
        self.table.write().remove(key)
    }

    fn clear(&self) {
        self.table.write().clear();
    }

    fn len(&self) -> usize {
        self.table.read().len()
    }
}

impl<K, V, S> Debug for LockedMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockedMap")
            .field("len", &self.table.read().len())
            .finish()
    }
}
