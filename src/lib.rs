//! A small, concurrent cache whose entries go stale a fixed time after they are written.
//!
//! Expiry is lazy: staleness is derived from the write timestamp when a key is read,
//! nothing is evicted in the background. A cache may carry a compute function that
//! supplies a fallback value on a miss or a stale read.
//!
//! # Quick Start
//! ```
//! use std::time::Duration;
//! use timed_cache::TimedCache;
//!
//! let cache = TimedCache::new(Duration::from_secs(1));
//! cache.set("a", 1);
//!
//! assert_eq!(cache.get(&"a"), Some(1));
//! assert_eq!(cache.get(&"b"), None);
//! ```
//!
//! Use a [`CacheBuilder`] to pick the ttl, compute function and backend.

pub mod cache;
#[doc(inline)]
pub use cache::{builder::CacheBuilder, TimedCache, DEFAULT_TTL};

/// A value and the instant it was written.
pub mod entry;
#[doc(inline)]
pub use entry::CacheEntry;

/// Interchangeable storage strategies for a [`TimedCache`].
pub mod backend;
#[doc(inline)]
pub use backend::{Backend, BackendKind, LockedMap};

/// The lock striped backend, designed for read heavy concurrent access.
pub mod map;
#[doc(inline)]
pub use map::ShardedMap;

#[doc(hidden)]
pub mod constants_for_benchmarking;
