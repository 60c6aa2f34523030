//! Round-robin partitioning of keyed work into a fixed number of shards.
//!
//! Keys are dealt out one at a time: the first key goes to shard 0, the
//! second to shard 1 and so on, wrapping after the last shard. Values travel
//! with their key, so a key is never split across shards.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// Default number of shards for batch reconciliation.
pub const DEFAULT_SHARD_COUNT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Split `input` into exactly `shards` maps by round-robin over its keys.
///
/// Keys are visited in ascending order, so the partition is deterministic.
/// Shards beyond the number of keys are returned empty.
pub fn split_round_robin<K: Ord, V>(
    input: BTreeMap<K, V>,
    shards: NonZeroUsize,
) -> Vec<BTreeMap<K, V>> {
    let mut out: Vec<BTreeMap<K, V>> = (0..shards.get()).map(|_| BTreeMap::new()).collect();
    for (idx, (key, value)) in input.into_iter().enumerate() {
        out[idx % shards.get()].insert(key, value);
    }
    out
}
