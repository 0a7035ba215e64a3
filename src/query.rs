//! Bounded top-*m* query collector with multiplicity-aware fill.
use crate::feature::FeatureVector;

/// Max-similarity search context. Transient: constructed fresh for each
/// [`crate::lsh::LSH::query`] call with `limit = m + 1`, so the query point
/// itself can occupy a slot without displacing a true neighbor; see
/// [`QueryContext::shrink`].
pub struct QueryContext<F> {
    neighbors: Vec<F>,
    similarities: Vec<f32>,
    ncopies: Vec<i32>,
    limit: usize,
    found: i32,
    uniques: usize,
    curmin: f32,
    curmin_index: Option<usize>,
}

impl<F: FeatureVector + Clone> QueryContext<F> {
    pub fn new(limit: usize) -> Self {
        QueryContext {
            neighbors: Vec::with_capacity(limit),
            similarities: Vec::with_capacity(limit),
            ncopies: Vec::with_capacity(limit),
            limit,
            found: 0,
            uniques: 0,
            curmin: f32::MAX,
            curmin_index: None,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Sum of `n_copies` currently held, `<= limit` (unless a future insert
    /// bumps `found` above `limit` via a multi-copy overwrite, which is
    /// expected and matches the original semantics).
    pub fn found(&self) -> i32 {
        self.found
    }

    pub fn uniques(&self) -> usize {
        self.uniques
    }

    fn update_min(&mut self) {
        let mut curmin = f32::MAX;
        let mut idx = None;
        for i in 0..self.uniques {
            let s = self.similarities[i];
            if s < curmin {
                curmin = s;
                idx = Some(i);
            }
        }
        self.curmin = curmin;
        self.curmin_index = idx;
    }

    /// Offer a candidate. Discarded if `n <= 0`. While fewer than `limit`
    /// uniques have been seen, every candidate is kept. Once `limit` is
    /// reached, a candidate only displaces the current minimum-similarity
    /// entry if it is strictly more similar (ties keep the incumbent).
    pub fn insert(&mut self, q: &F, s: f32, n: i32) {
        if n <= 0 {
            return;
        }

        if self.uniques < self.limit {
            self.neighbors.push(q.clone());
            self.similarities.push(s);
            self.ncopies.push(n);
            self.found += n;
            self.uniques += 1;
            if self.uniques == self.limit {
                self.update_min();
            }
            return;
        }

        if s <= self.curmin {
            return;
        }

        let idx = self
            .curmin_index
            .expect("curmin_index is established as soon as uniques reaches limit");
        self.found -= self.ncopies[idx];
        self.neighbors[idx] = q.clone();
        self.similarities[idx] = s;
        self.ncopies[idx] = n;
        self.found += n;
        self.update_min();
    }

    /// Used internally by [`crate::lsh::LSH::query`]. Removes the entry with
    /// maximum similarity (the query point itself, which was inserted
    /// alongside its neighbors) in a quick & dirty way: swap with the last
    /// entry and drop it. If that entry's `n_copies() > 1` it is kept
    /// instead, since it then also represents other, real, points.
    ///
    /// No further `insert` calls are valid after `shrink`; only
    /// [`QueryContext::neighbors`] may be called.
    pub fn shrink(&mut self) {
        if self.uniques == 0 {
            return;
        }

        let mut curmax = f32::MIN;
        let mut idx = 0;
        for i in 0..self.uniques {
            if self.similarities[i] > curmax {
                curmax = self.similarities[i];
                idx = i;
            }
        }

        if self.ncopies[idx] > 1 {
            return;
        }

        let last = self.uniques - 1;
        self.neighbors.swap(idx, last);
        self.similarities.swap(idx, last);
        self.ncopies.swap(idx, last);
        self.neighbors.truncate(last);
        self.similarities.truncate(last);
        self.ncopies.truncate(last);
        self.uniques = last;
    }

    /// Consume the context and return the current neighbor list. Order is
    /// unspecified.
    pub fn neighbors(self) -> Vec<F> {
        self.neighbors
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct P(i32);
    impl FeatureVector for P {
        fn dot(&self, _v: &[f32]) -> f32 {
            0.0
        }
        fn similarity(&self, _other: &Self) -> f32 {
            0.0
        }
    }

    #[test]
    fn test_top_m() {
        let mut c = QueryContext::new(3);
        for (i, s) in [0.1, 0.5, 0.2, 0.9, 0.3, 0.8].iter().enumerate() {
            c.insert(&P(i as i32), *s, 1);
        }
        let mut sims: Vec<f32> = vec![];
        let kept = c.neighbors();
        assert_eq!(kept.len(), 3);
        for p in &kept {
            sims.push([0.1, 0.5, 0.2, 0.9, 0.3, 0.8][p.0 as usize]);
        }
        sims.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sims, vec![0.5, 0.8, 0.9]);
    }

    #[test]
    fn test_n_copies_le_zero_discarded() {
        let mut c = QueryContext::new(2);
        c.insert(&P(0), 1.0, 0);
        c.insert(&P(1), 1.0, -1);
        assert_eq!(c.uniques(), 0);
        assert_eq!(c.found(), 0);
    }

    #[test]
    fn test_limit_zero_never_retains() {
        let mut c: QueryContext<P> = QueryContext::new(0);
        c.insert(&P(0), 1.0, 1);
        c.insert(&P(1), 2.0, 5);
        assert_eq!(c.neighbors().len(), 0);
    }

    #[test]
    fn test_tie_no_replacement() {
        let mut c = QueryContext::new(2);
        c.insert(&P(0), 1.0, 1);
        c.insert(&P(1), 1.0, 1);
        // both at curmin == 1.0; third candidate ties curmin, must not replace
        c.insert(&P(2), 1.0, 1);
        let kept = c.neighbors();
        assert_eq!(kept, vec![P(0), P(1)]);
    }

    #[test]
    fn test_shrink_keeps_multi_copy_max() {
        let mut c = QueryContext::new(3);
        c.insert(&P(0), 1.0, 2);
        c.insert(&P(1), 0.8, 1);
        c.insert(&P(2), 0.5, 1);
        c.shrink();
        let kept = c.neighbors();
        assert!(kept.contains(&P(0)));
    }

    #[test]
    fn test_shrink_removes_single_copy_max() {
        let mut c = QueryContext::new(3);
        c.insert(&P(0), 1.0, 1);
        c.insert(&P(1), 0.8, 1);
        c.insert(&P(2), 0.5, 1);
        c.shrink();
        let kept = c.neighbors();
        assert_eq!(kept.len(), 2);
        assert!(!kept.contains(&P(0)));
    }

    #[test]
    fn test_shrink_on_singleton() {
        let mut c = QueryContext::new(1);
        c.insert(&P(0), 1.0, 1);
        c.shrink();
        assert_eq!(c.neighbors().len(), 0);
    }

    #[test]
    fn test_found_tracks_copies() {
        let mut c = QueryContext::new(2);
        c.insert(&P(0), 0.5, 3);
        c.insert(&P(1), 0.9, 2);
        assert_eq!(c.found(), 5);
        // overwrite the minimum (0.5, n=3) with a higher similarity, n=4
        c.insert(&P(2), 0.95, 4);
        assert_eq!(c.found(), 6);
    }
}
