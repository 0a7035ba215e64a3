//! Bucket tables and the reference-identity key used to cache a point's
//! hashes without requiring `F: Eq + Hash`.
use crate::hash::HashWord;
use fnv::FnvHashMap;
use std::hash::{Hash, Hasher as StdHasher};

/// Wraps a borrowed point so that two references to the *same* point
/// compare equal and hash identically, regardless of whatever `F` itself
/// implements (or doesn't) for equality. Identity is address identity, not
/// `F::eq`: two distinct points that happen to be bitwise-equal are still
/// distinct keys.
pub struct PointKey<'a, F>(pub &'a F);

impl<'a, F> PartialEq for PointKey<'a, F> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'a, F> Eq for PointKey<'a, F> {}

impl<'a, F> Hash for PointKey<'a, F> {
    fn hash<H: StdHasher>(&self, state: &mut H) {
        (self.0 as *const F as usize).hash(state);
    }
}

impl<'a, F> Clone for PointKey<'a, F> {
    fn clone(&self) -> Self {
        PointKey(self.0)
    }
}

impl<'a, F> Copy for PointKey<'a, F> {}

/// One hash table: a map from compound hash word to the bucket of points
/// that landed in it.
pub struct BucketTable<'a, F> {
    buckets: FnvHashMap<HashWord, Vec<&'a F>>,
}

impl<'a, F> BucketTable<'a, F> {
    pub fn new() -> Self {
        BucketTable {
            buckets: FnvHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: HashWord, p: &'a F) {
        self.buckets.entry(key).or_insert_with(Vec::new).push(p);
    }

    pub fn get(&self, key: HashWord) -> Option<&Vec<&'a F>> {
        self.buckets.get(&key)
    }

    pub fn n_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn bucket_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.values().map(|v| v.len())
    }

    /// Drop any spare capacity left over from incremental bucket growth.
    /// Pure memory hygiene, called once after a batch insert completes.
    pub fn shrink_to_fit(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.shrink_to_fit();
        }
    }
}

/// Caches the `l`-length hash tuple last computed for a point, keyed by
/// reference identity. Lets a duplicate `insert` of the same reference skip
/// both the `O(k*l*d)` rehash and any duplicate bucket entries.
pub struct HashCache<'a, F> {
    entries: FnvHashMap<PointKey<'a, F>, Vec<HashWord>>,
}

impl<'a, F> HashCache<'a, F> {
    pub fn new() -> Self {
        HashCache {
            entries: FnvHashMap::default(),
        }
    }

    pub fn get(&self, p: &'a F) -> Option<&Vec<HashWord>> {
        self.entries.get(&PointKey(p))
    }

    pub fn insert(&mut self, p: &'a F, hashes: Vec<HashWord>) {
        self.entries.insert(PointKey(p), hashes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_point_key_identity_not_value() {
        let a = 7i32;
        let b = 7i32;
        assert!(PointKey(&a) != PointKey(&b));
        assert!(PointKey(&a) == PointKey(&a));
    }

    #[test]
    fn test_bucket_table_basic() {
        let mut t: BucketTable<'_, i32> = BucketTable::new();
        let a = 1i32;
        let b = 2i32;
        t.insert(5, &a);
        t.insert(5, &b);
        t.insert(9, &a);
        assert_eq!(t.get(5).unwrap().len(), 2);
        assert_eq!(t.get(9).unwrap().len(), 1);
        assert!(t.get(1).is_none());
        assert_eq!(t.n_buckets(), 2);
    }

    #[test]
    fn test_hash_cache_roundtrip() {
        let mut c: HashCache<'_, i32> = HashCache::new();
        let a = 1i32;
        assert!(c.get(&a).is_none());
        c.insert(&a, vec![1, 2, 3]);
        assert_eq!(c.get(&a).unwrap(), &vec![1, 2, 3]);
        assert_eq!(c.len(), 1);
    }
}
