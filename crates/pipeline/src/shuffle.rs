//! Key routing between the map and reduce sides of a stage.
//!
//! Map tasks route every emitted pair to a partition with `partition_for`.
//! Once all map tasks are done, each partition's runs are grouped by key
//! with `group_by_key` and handed to one reduce task.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Pick the reduce partition for a key.
///
/// Uses a fixed-key hasher so the same key always lands in the same
/// partition, across tasks and across runs.
pub fn partition_for<K: Hash + ?Sized>(key: &K, num_partitions: usize) -> usize {
    if num_partitions <= 1 {
        return 0;
    }
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % num_partitions as u64) as usize
}

/// Group the runs destined for one partition by key.
///
/// Keys come out in ascending order. Values for a key keep the order of
/// the runs they arrived in, then their order within each run.
pub fn group_by_key<K: Ord, V>(runs: Vec<Vec<(K, V)>>) -> BTreeMap<K, Vec<V>> {
    let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for run in runs {
        for (key, value) in run {
            groups.entry(key).or_default().push(value);
        }
    }
    groups
}
