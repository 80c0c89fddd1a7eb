pub mod builder;

use crate::backend::{Backend, LockedMap};
use crate::entry::CacheEntry;

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long entries stay fresh when no ttl is configured
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// A fallback value generator, called with no knowledge of which key missed
pub type Compute<V> = Arc<dyn Fn() -> V + Send + Sync>;

/// A concurrent key/value cache whose entries go stale `ttl` after they were written.
///
/// Staleness is only ever checked when a key is read, nothing runs in the background
/// and stale entries stay in memory until they are overwritten, removed or cleared.
///
/// Cloning a [`TimedCache`] is cheap and the clones share the same entries.
///
/// ### Note
/// [`Self::get`] is not atomic. If several callers miss on the same key at once they will each
/// call the compute function and each write its result, the last write wins.
/// Callers that need at most one computation per key must coordinate that themselves.
pub struct TimedCache<K, V, B = LockedMap<K, V>> {
    inner: Arc<CacheInner<V, B>>,
    _key: PhantomData<fn(K)>,
}

struct CacheInner<V, B> {
    backend: B,
    ttl: Duration,
    compute: Option<Compute<V>>,
}

impl<K, V, B> Clone for TimedCache<K, V, B> {
    fn clone(&self) -> Self {
        TimedCache {
            inner: self.inner.clone(),
            _key: PhantomData,
        }
    }
}

impl<K, V> TimedCache<K, V> {
    /// A cache over a [`LockedMap`] with no compute function
    pub fn new(ttl: Duration) -> Self {
        Self::from_parts(LockedMap::new(), ttl, None)
    }

    /// A cache over a [`LockedMap`] that calls `compute` on a miss or when an entry has gone stale
    pub fn with_compute<F>(ttl: Duration, compute: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self::from_parts(LockedMap::new(), ttl, Some(Arc::new(compute)))
    }
}

impl<K, V> Default for TimedCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<K, V, B> TimedCache<K, V, B> {
    pub fn from_parts(backend: B, ttl: Duration, compute: Option<Compute<V>>) -> Self {
        tracing::debug!(?ttl, compute = compute.is_some(), "creating timed cache");

        TimedCache {
            inner: Arc::new(CacheInner {
                backend,
                ttl,
                compute,
            }),
            _key: PhantomData,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    pub fn has_compute(&self) -> bool {
        self.inner.compute.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }
}

impl<K, V, B> TimedCache<K, V, B>
where
    K: Eq + Hash + Clone,
    V: Clone,
    B: Backend<K, V>,
{
    /// Insert or replace the value for `key`, stamped with the current time
    pub fn set(&self, key: K, value: V) {
        self.inner.backend.insert(key, CacheEntry::new(value));
    }

    /// Get the value for `key` if it was written no more than `ttl` ago.
    ///
    /// On a miss, or if the entry is stale, the compute function is called and its result is
    /// stored under `key` and returned. Without a compute function this returns `None` and
    /// leaves any stale entry where it is.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_within(key, self.inner.ttl)
    }

    /// Like [`Self::get`], but judges freshness against `max_age` for this call only.
    ///
    /// Nothing about the stored entry or the cache wide ttl changes.
    pub fn get_within(&self, key: &K, max_age: Duration) -> Option<V> {
        let now = Instant::now();

        match self.inner.backend.get(key) {
            Some(entry) if entry.is_fresh(max_age, now) => {
                tracing::trace!(age = ?entry.age(now), "cache hit");
                return Some(entry.into_value());
            }
            Some(entry) => tracing::trace!(age = ?entry.age(now), ?max_age, "cache entry expired"),
            None => tracing::trace!("cache miss"),
        }

        self.recompute(key)
    }

    /// Like [`Self::get`] but yields `V::default()` where `get` would yield `None`
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Whether a fresh entry exists for `key`, never calls the compute function
    pub fn contains_fresh(&self, key: &K) -> bool {
        let now = Instant::now();

        self.inner
            .backend
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.inner.ttl, now))
    }

    /// Remove the entry for `key`, returning its value whether or not it had gone stale
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.backend.remove(key).map(CacheEntry::into_value)
    }

    /// Discard every entry. The ttl and compute function are kept.
    pub fn clear(&self) {
        self.inner.backend.clear();

        tracing::debug!("cache cleared");
    }

    /// Number of stored entries, including stale ones that have not been overwritten
    pub fn len(&self) -> usize {
        self.inner.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.backend.is_empty()
    }

    // no lock is held while compute runs
    fn recompute(&self, key: &K) -> Option<V> {
        let compute = self.inner.compute.as_ref()?;

        let value = compute();
        tracing::trace!("computed fallback value");

        self.set(key.clone(), value.clone());

        Some(value)
    }
}

impl<K, V, B> Debug for TimedCache<K, V, B>
where
    B: Backend<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.inner.ttl)
            .field("compute", &self.inner.compute.is_some())
            .field("len", &self.inner.backend.len())
            .finish()
    }
}
