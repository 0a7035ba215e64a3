//! The index: ties a [`Hasher`] to a set of bucket tables and answers
//! approximate nearest-neighbor queries over them.
use crate::error::{Error, Result};
use crate::feature::FeatureVector;
use crate::hash::{Hasher, SLSH};
use crate::query::QueryContext;
use crate::stats::occupancy_stats;
use crate::table::{BucketTable, HashCache};

/// An LSH index over points of type `F`, borrowed for the lifetime `'a` of
/// the corpus, hashed with hash family `H`.
///
/// Points are never copied into the index; only references are stored, so
/// the caller owns the corpus (typically a `Vec<F>`) for at least as long
/// as this index is alive. Query points are drawn from that same corpus:
/// `query` only ever reports a neighbor list for a `p` that was previously
/// passed to `insert`, by identity.
pub struct LSH<'a, F, H> {
    hasher: H,
    tables: Vec<BucketTable<'a, F>>,
    cache: HashCache<'a, F>,
    d: usize,
    k: usize,
    l: usize,
}

impl<'a, F: FeatureVector + Clone, H: Hasher<F>> LSH<'a, F, H> {
    /// `d`/`k`/`l` are recorded alongside `hasher` for `describe()`; `l` must
    /// agree with `hasher.l()`.
    pub fn new(d: usize, k: usize, l: usize, hasher: H) -> Result<Self> {
        if d == 0 {
            return Err(Error::InvalidDimension);
        }
        if k == 0 || l == 0 || hasher.l() != l {
            return Err(Error::InvalidParameter);
        }

        let tables = (0..l).map(|_| BucketTable::new()).collect();
        Ok(LSH {
            hasher,
            tables,
            cache: HashCache::new(),
            d,
            k,
            l,
        })
    }

    /// Bulk-insert `points` into every table. Re-inserting a point already
    /// present (by reference identity) is a contract violation and panics;
    /// callers are expected to track what they've inserted rather than rely
    /// on this index to absorb duplicates.
    ///
    /// After the batch, every bucket's backing storage is shrunk to fit.
    /// Pure memory hygiene, no effect on subsequent lookups.
    pub fn insert(&mut self, points: &[&'a F]) {
        for &p in points {
            assert!(
                self.cache.get(p).is_none(),
                "point already present in the index"
            );

            let mut g = Vec::with_capacity(self.hasher.l());
            self.hasher.hash(p, &mut g);
            debug_assert_eq!(g.len(), self.tables.len());

            for (table, &key) in self.tables.iter_mut().zip(g.iter()) {
                table.insert(key, p);
            }
            self.cache.insert(p, g);
        }

        for table in self.tables.iter_mut() {
            table.shrink_to_fit();
        }
    }

    /// The `m` points most similar to `p`, excluding `p` itself unless it
    /// represents more than one original point (see
    /// [`crate::query::QueryContext::shrink`]). Returns an empty list,
    /// silently, if `p` was never inserted. If `linear_search_size` is
    /// supplied, the size of every bucket examined is added to it: a
    /// running count of how much work a naive linear scan over the same
    /// candidates would have cost.
    ///
    /// A candidate that shares a bucket with `p` in more than one table is
    /// offered to the collector once per table, not deduplicated. The
    /// query point itself is a case of this once `l > 1`, since it always
    /// shares every one of its own `l` buckets with itself. `shrink` only
    /// ever removes one such occurrence, so a point found via `k` of the
    /// `l` tables can still end up represented by as many as `k` entries.
    /// This mirrors the original, table-indexed-independently behavior.
    pub fn query(&self, p: &'a F, m: usize, mut linear_search_size: Option<&mut usize>) -> Vec<F> {
        let g = match self.cache.get(p) {
            Some(g) => g,
            None => return Vec::new(),
        };

        let mut ctx = QueryContext::new(m + 1);

        for (table, &key) in self.tables.iter().zip(g.iter()) {
            if let Some(bucket) = table.get(key) {
                if let Some(counter) = linear_search_size.as_deref_mut() {
                    *counter += bucket.len();
                }
                for &q in bucket {
                    let s = p.similarity(q);
                    ctx.insert(q, s, q.n_copies());
                }
            }
        }

        ctx.shrink();
        ctx.neighbors()
    }

    /// Number of distinct points inserted.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One line per table: bucket count and mean/max occupancy. Meant for
    /// eyeballing whether a corpus/parameter choice is producing a sane
    /// bucket-size distribution, not for parsing.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "LSH: d={}, k={}, l={}, {} points\n",
            self.d,
            self.k,
            self.l,
            self.len()
        ));
        for (i, table) in self.tables.iter().enumerate() {
            let s = occupancy_stats(table.bucket_lens());
            out.push_str(&format!(
                "  table {}: {} buckets, mean occupancy {:.2}, max occupancy {}\n",
                i, s.n_buckets, s.mean, s.max
            ));
        }
        out
    }
}

impl<'a, F: FeatureVector + Clone> LSH<'a, F, SLSH<F>> {
    /// Build an index backed by [`SLSH`] directly, without constructing the
    /// hasher separately first. The recorded `k` is the hasher's *effective*
    /// (possibly clipped) value.
    pub fn with_slsh(d: usize, k: usize, l: usize, seed: u64) -> Result<Self> {
        let hasher = SLSH::new(d, k, l, seed)?;
        let k_eff = hasher.k();
        Self::new(d, k_eff, l, hasher)
    }
}
