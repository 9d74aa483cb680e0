use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn partition_of<K: Hash + ?Sized>(key: &K, partitions: usize) -> usize {
    let mut h = DefaultHasher::new();
    key.hash(&mut h);
    (h.finish() as usize) % partitions.max(1)
}
