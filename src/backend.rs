use crate::entry::CacheEntry;

pub mod locked;

pub use locked::LockedMap;

/// Storage for a [`crate::TimedCache`].
///
/// Implementations must serialize writes to any one key and must hand back whole entries,
/// a reader never sees a value from one write paired with the timestamp of another.
/// Expiry is not the backend's concern, it stores whatever it is given until told otherwise.
pub trait Backend<K, V> {
    /// Clone out the entry for `key`, if any
    fn get(&self, key: &K) -> Option<CacheEntry<V>>;

    /// Insert or replace the entry for `key`, returning the previous one
    fn insert(&self, key: K, entry: CacheEntry<V>) -> Option<CacheEntry<V>>;

    fn remove(&self, key: &K) -> Option<CacheEntry<V>>;

    /// Discard every entry as one atomic step
    fn clear(&self);

    /// Number of stored entries, expired or not
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which storage strategy a [`crate::CacheBuilder`] should build.
///
/// Both behave identically from the caller's point of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// One read/write lock around a single map, see [`LockedMap`]
    #[default]
    LockedMap,
    /// A lock striped map for read heavy workloads, see [`crate::ShardedMap`]
    ConcurrentMap,
}

/// A backend chosen at runtime
pub type DynBackend<K, V> = Box<dyn Backend<K, V> + Send + Sync>;

impl<K, V, B> Backend<K, V> for Box<B>
where
    B: Backend<K, V> + ?Sized,
{
    #[inline]
    fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        (**self).get(key)
    }

    #[inline]
    fn insert(&self, key: K, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        (**self).insert(key, entry)
    }

    #[inline]
    fn remove(&self, key: &K) -> Option<CacheEntry<V>> {
        (**self).remove(key)
    }

    #[inline]
    fn clear(&self) {
        (**self).clear()
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }
}
