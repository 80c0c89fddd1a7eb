pub mod builder;

use parking_lot::{RwLock, RwLockWriteGuard};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash, Hasher};

use hashbrown::hash_map::{DefaultHashBuilder, HashMap};

use crate::backend::Backend;
use crate::entry::CacheEntry;

/// A lock striped hashmap.
///
/// Keys are spread over a power of two number of shards, each behind its own read/write lock,
/// so writers only contend with operations that land on the same shard.
/// Since values are cloned out, no lock is ever held after a call returns.
pub struct ShardedMap<K, V, S = DefaultHashBuilder> {
    pub(crate) build_hasher: S,
    shift: u32,
    shards: Box<[Shard<K, V, S>]>,
}

pub(crate) struct Shard<K, V, S> {
    table: RwLock<HashMap<K, CacheEntry<V>, S>>,
}

impl<K, V> ShardedMap<K, V> {
    pub fn new() -> Self {
        builder::MapBuilder::new().build(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        builder::MapBuilder::new()
            .estimated_size(capacity)
            .build(Default::default())
    }
}

impl<K, V> Default for ShardedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S: BuildHasher + Clone> ShardedMap<K, V, S> {
    pub fn with_hasher(build_hasher: S) -> Self {
        builder::MapBuilder::new().build(build_hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Self {
        builder::MapBuilder::new()
            .estimated_size(capacity)
            .build(build_hasher)
    }
}

impl<K, V, S> ShardedMap<K, V, S> {
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

impl<K, V, S> ShardedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn shard_index(&self, key: &K) -> usize {
        let hash = hash_key(&self.build_hasher, key);

        // skip the top 7 bits, hashbrown uses those for its control bytes
        (hash << 7).checked_shr(self.shift).unwrap_or(0) as usize
    }

    pub(crate) fn shard(&self, key: &K) -> &Shard<K, V, S> {
        let idx = self.shard_index(key);

        match self.shards.get(idx) {
            Some(shard) => shard,
            None => unreachable!(
                "shard index {} out of range for {} shards, this is a bug",
                idx,
                self.shards.len()
            ),
        }
    }
}

impl<K, V, S> Backend<K, V> for ShardedMap<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        self.shard(key).table.read().get(key).cloned()
    }

    fn insert(&self, key: K, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        self.shard(&key).table.write().insert(key, entry)
    }

    fn remove(&self, key: &K) -> Option<CacheEntry<V>> {
        self.shard(key).table.write().remove(key)
    }

    /// Takes every shard's write lock, in order, before discarding anything.
    fn clear(&self) {
        let mut tables: Vec<RwLockWriteGuard<'_, _>> =
            self.shards.iter().map(|s| s.table.write()).collect();

        for table in tables.iter_mut() {
            table.clear();
        }
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|s| s.table.read().len()).sum()
    }
}

impl<K, V, S> Debug for ShardedMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedMap")
            .field("shards", &self.shards.len())
            .field(
                "len",
                &self.shards.iter().map(|s| s.table.read().len()).sum::<usize>(),
            )
            .finish()
    }
}

pub(crate) fn hash_key<K, S>(build_hasher: &S, key: &K) -> u64
where
    K: Hash,
    S: BuildHasher,
{
    let mut hasher = build_hasher.build_hasher();
    key.hash(&mut hasher);
    hasher.finish()
}

fn max_parrellism() -> usize {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static AVAILABLE_PARALLELISM: AtomicUsize = AtomicUsize::new(0);
    let mut ap = AVAILABLE_PARALLELISM.load(Ordering::Relaxed);
    if ap == 0 {
        ap = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        AVAILABLE_PARALLELISM.store(ap, Ordering::Relaxed);
    }
    ap
}
