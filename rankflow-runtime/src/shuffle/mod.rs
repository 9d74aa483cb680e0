pub mod partitioner;

use std::collections::BTreeMap;
use std::hash::Hash;

pub type Outbox<K, V> = Vec<(K, V)>;
/// Values grouped by key; keys are visited in ascending order when drained.
pub type Inbox<K, V> = BTreeMap<K, Vec<V>>;
pub type Inboxes<K, V> = Vec<Inbox<K, V>>;

pub trait MessageShuffle<K, V>: Send + Sync {
    fn route_outbox(&self, outbox: Outbox<K, V>, partitions: usize, next_inboxes: &mut Inboxes<K, V>);
}

/// Routes every key to `partition_of(key)`, so all values of one key end up
/// in the same inbox and are aggregated by a single task.
pub struct HashShuffle;

impl<K, V> MessageShuffle<K, V> for HashShuffle
where
    K: Hash + Ord,
{
    fn route_outbox(&self, outbox: Outbox<K, V>, partitions: usize, next_inboxes: &mut Inboxes<K, V>) {
        for (target, msg) in outbox {
            let p = partitioner::partition_of(&target, partitions);
            next_inboxes[p].entry(target).or_default().push(msg);
        }
    }
}

pub fn new_inboxes<K, V>(partitions: usize) -> Inboxes<K, V> {
    (0..partitions.max(1)).map(|_| BTreeMap::new()).collect()
}
