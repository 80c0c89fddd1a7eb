use std::time::{Duration, Instant};

/// A value paired with the instant it was written.
///
/// Entries are never mutated in place, a write to an existing key replaces the whole entry.
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Create an entry stamped with the current instant
    pub fn new(value: V) -> Self {
        Self::with_timestamp(value, Instant::now())
    }

    pub fn with_timestamp(value: V, inserted_at: Instant) -> Self {
        CacheEntry { value, inserted_at }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    /// How long ago this entry was written, saturating at zero if `now` is earlier
    #[inline]
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    /// An entry is fresh while its age has not exceeded `ttl`.
    ///
    /// The boundary is inclusive: an entry exactly `ttl` old is still fresh.
    #[inline]
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) <= ttl
    }
}
