//! Bucket-sharded map for multi-writer accumulation.
//!
//! Each bucket is its own `parking_lot::Mutex<BTreeMap>`; a key always lands in
//! bucket `key mod bucket_count`. Writers touching keys in different buckets
//! never contend. There is no cross-bucket atomicity: a consistent snapshot
//! only exists once every writer has finished.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

/// Integer keys that can pick a bucket.
pub trait BucketKey: Copy + Ord {
    fn bucket_index(self, bucket_count: usize) -> usize;
}

macro_rules! impl_bucket_key {
    ($($t:ty),*) => {
        $(
            impl BucketKey for $t {
                #[inline]
                fn bucket_index(self, bucket_count: usize) -> usize {
                    // Negative keys wrap, same as a plain unsigned cast.
                    (self as u64 % bucket_count as u64) as usize
                }
            }
        )*
    };
}

impl_bucket_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Exclusive handle to one value. The bucket lock is released on drop.
pub type Access<'a, V> = MappedMutexGuard<'a, V>;

pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: BucketKey, V> ConcurrentMap<K, V> {
    /// A zero bucket count is bumped to one.
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { buckets }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[key.bucket_index(self.buckets.len())]
    }

    /// Lock the key's bucket and hand out its value, inserting `V::default()`
    /// first if absent.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        MutexGuard::map(self.bucket(key).lock(), |map| map.entry(key).or_default())
    }

    pub fn erase(&self, key: K) -> Option<V> {
        self.bucket(key).lock().remove(&key)
    }

    /// Merge all buckets into one ordered map, holding one bucket lock at a time.
    pub fn build_ordinary_map(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut result = BTreeMap::new();
        for bucket in &self.buckets {
            let guard = bucket.lock();
            result.extend(guard.iter().map(|(k, v)| (*k, v.clone())));
        }
        result
    }

    /// Consume the map without locking; ownership proves no writer is left.
    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut result = BTreeMap::new();
        for bucket in self.buckets {
            result.extend(bucket.into_inner());
        }
        result
    }
}
