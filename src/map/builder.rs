use super::{max_parrellism, Shard, ShardedMap};

use hashbrown::HashMap;
use parking_lot::RwLock;

use std::hash::BuildHasher;

#[derive(Clone, Copy, Debug, Default)]
pub struct MapBuilder {
    pub(crate) shards: Option<usize>,
    pub(crate) estimated_size: Option<usize>,
}

impl MapBuilder {
    pub fn new() -> Self {
        MapBuilder {
            shards: None,
            estimated_size: None,
        }
    }

    /// Rounded up to the next power of two when built
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    pub fn estimated_size(mut self, estimated_size: usize) -> Self {
        self.estimated_size = Some(estimated_size);
        self
    }

    /// # Panics
    /// If the shard count was set to zero
    pub fn build<K, V, S: BuildHasher + Clone>(self, build_hasher: S) -> ShardedMap<K, V, S> {
        let shards = self.shards.unwrap_or_else(|| max_parrellism() * 4);

        assert!(shards > 0, "ShardedMap needs at least one shard");

        let shards = shards.next_power_of_two();

        let per_shard = match self.estimated_size {
            Some(estimated_size) if estimated_size > shards => (estimated_size / shards) * 2,
            _ => 0,
        };

        let shift = u64::BITS - shards.trailing_zeros();

        let shards = (0..shards)
            .map(|_| Shard {
                table: RwLock::new(HashMap::with_capacity_and_hasher(
                    per_shard,
                    build_hasher.clone(),
                )),
            })
            .collect();

        ShardedMap {
            shards,
            shift,
            build_hasher,
        }
    }
}
