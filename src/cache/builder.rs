use super::{Compute, TimedCache, DEFAULT_TTL};
use crate::backend::{BackendKind, DynBackend, LockedMap};
use crate::map::builder::MapBuilder;
use crate::map::ShardedMap;

use hashbrown::hash_map::DefaultHashBuilder;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// Configures and builds a [`TimedCache`].
///
/// ```
/// use std::time::Duration;
/// use timed_cache::{BackendKind, CacheBuilder};
///
/// let cache = CacheBuilder::new()
///     .ttl(Duration::from_secs(5))
///     .compute(|| String::from("fallback"))
///     .backend(BackendKind::ConcurrentMap)
///     .build::<u32>();
///
/// assert_eq!(cache.get(&1).as_deref(), Some("fallback"));
/// ```
pub struct CacheBuilder<V> {
    ttl: Duration,
    compute: Option<Compute<V>>,
    backend: BackendKind,
    map: MapBuilder,
}

impl<V> CacheBuilder<V> {
    pub fn new() -> Self {
        CacheBuilder {
            ttl: DEFAULT_TTL,
            compute: None,
            backend: BackendKind::default(),
            map: MapBuilder::new(),
        }
    }

    /// How long an entry stays fresh after it is written, defaults to [`DEFAULT_TTL`]
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Called on a miss or a stale read, its result is stored and returned
    pub fn compute<F>(mut self, compute: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.compute = Some(Arc::new(compute));
        self
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Shard count for [`BackendKind::ConcurrentMap`], ignored by the locked map
    pub fn shards(mut self, shards: usize) -> Self {
        self.map = self.map.shards(shards);
        self
    }

    /// Preallocate room for about this many entries
    pub fn estimated_size(mut self, estimated_size: usize) -> Self {
        self.map = self.map.estimated_size(estimated_size);
        self
    }

    /// Build a cache over whichever backend was selected.
    ///
    /// # Panics
    /// If [`Self::shards`] was set to zero and the concurrent map was selected
    pub fn build<K>(self) -> TimedCache<K, V, DynBackend<K, V>>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let backend: DynBackend<K, V> = match self.backend {
            BackendKind::LockedMap => Box::new(self.locked_map::<K>()),
            BackendKind::ConcurrentMap => {
                Box::new(self.map.build::<K, V, DefaultHashBuilder>(Default::default()))
            }
        };

        tracing::debug!(backend = ?self.backend, "building timed cache");

        TimedCache::from_parts(backend, self.ttl, self.compute)
    }

    pub fn build_locked<K>(self) -> TimedCache<K, V, LockedMap<K, V>> {
        TimedCache::from_parts(self.locked_map(), self.ttl, self.compute)
    }

    /// # Panics
    /// If [`Self::shards`] was set to zero
    pub fn build_sharded<K>(self) -> TimedCache<K, V, ShardedMap<K, V>> {
        TimedCache::from_parts(self.map.build(Default::default()), self.ttl, self.compute)
    }

    fn locked_map<K>(&self) -> LockedMap<K, V> {
        match self.map.estimated_size {
            Some(capacity) => LockedMap::with_capacity(capacity),
            None => LockedMap::new(),
        }
    }
}

impl<V> Default for CacheBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Debug for CacheBuilder<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("ttl", &self.ttl)
            .field("compute", &self.compute.is_some())
            .field("backend", &self.backend)
            .field("map", &self.map)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let builder = CacheBuilder::<u8>::new();

        assert_eq!(builder.ttl, DEFAULT_TTL);
        assert_eq!(builder.backend, BackendKind::LockedMap);
        assert!(builder.compute.is_none());

        let cache = builder.build::<u8>();
        assert_eq!(cache.ttl(), DEFAULT_TTL);
        assert!(!cache.has_compute());
    }

    #[test]
    fn test_both_backends_behave_the_same() {
        for kind in [BackendKind::LockedMap, BackendKind::ConcurrentMap] {
            let cache = CacheBuilder::new()
                .ttl(Duration::from_millis(500))
                .compute(|| -1)
                .backend(kind)
                .shards(4)
                .estimated_size(64)
                .build::<&'static str>();

            cache.set("a", 1);
            assert_eq!(cache.get(&"a"), Some(1), "{:?}", kind);
            assert_eq!(cache.get(&"b"), Some(-1), "{:?}", kind);
            assert_eq!(cache.len(), 2, "{:?}", kind);

            cache.clear();
            assert!(cache.is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn test_typed_builds() {
        let locked = CacheBuilder::new().ttl(Duration::from_secs(1)).build_locked::<u8>();
        let sharded = CacheBuilder::new().shards(2).build_sharded::<u8>();

        locked.set(1, "x");
        sharded.set(1, "y");

        assert_eq!(locked.get(&1), Some("x"));
        assert_eq!(sharded.get(&1), Some("y"));
        assert_eq!(sharded.backend().shard_count(), 2);
    }

    #[test]
    #[should_panic(expected = "at least one shard")]
    fn test_zero_shards_panics_for_concurrent_map() {
        CacheBuilder::<u8>::new()
            .backend(BackendKind::ConcurrentMap)
            .shards(0)
            .build::<u8>();
    }
}
