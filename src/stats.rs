//! Ambient diagnostics: bucket-occupancy summaries (what [`crate::lsh::LSH::describe`]
//! reports) and the table-count estimator used to choose `L` for a target
//! recall.
use std::time::Duration;

/// Summary of how candidates are spread across one table's buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupancyStats {
    pub n_buckets: usize,
    pub mean: f64,
    pub max: usize,
}

pub fn occupancy_stats<I: IntoIterator<Item = usize>>(lens: I) -> OccupancyStats {
    let lens: Vec<usize> = lens.into_iter().collect();
    let n_buckets = lens.len();
    let total: usize = lens.iter().sum();
    let max = lens.iter().copied().max().unwrap_or(0);
    let mean = if n_buckets == 0 {
        0.0
    } else {
        total as f64 / n_buckets as f64
    };
    OccupancyStats {
        n_buckets,
        mean,
        max,
    }
}

/// Number of tables `L` needed so a true neighbor with single-hash
/// collision probability `p1` survives `k`-deep AND amplification and is
/// still returned with probability at least `1 - delta`.
///
/// `p1` and `k` come from the hash family (for SLSH, `p1` is the
/// single-rotation collision probability of the neighbor pair in question,
/// not a crate-wide constant); callers that want to tune recall empirically
/// should estimate `p1` offline and feed it here rather than guessing `L`.
pub fn estimate_l(delta: f64, p1: f64, k: usize) -> usize {
    (delta.ln() / (1.0 - p1.powf(k as f64)).ln()).round() as usize
}

/// Wall-clock budget helper: given a measured per-query duration and a
/// target throughput, how many queries fit in `budget`. Used by callers
/// sizing a benchmark run, not by the index itself.
pub fn queries_fitting(budget: Duration, per_query: Duration) -> usize {
    if per_query.is_zero() {
        return usize::MAX;
    }
    (budget.as_secs_f64() / per_query.as_secs_f64()).floor() as usize
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_occupancy_stats_empty() {
        let s = occupancy_stats(Vec::<usize>::new());
        assert_eq!(s.n_buckets, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.max, 0);
    }

    #[test]
    fn test_occupancy_stats_basic() {
        let s = occupancy_stats(vec![1, 2, 3, 4]);
        assert_eq!(s.n_buckets, 4);
        assert_eq!(s.max, 4);
        assert!((s.mean - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_l() {
        let delta = 0.2;
        let p1 = 0.6;
        let k = 5;
        assert_eq!(20, estimate_l(delta, p1, k));
    }

    #[test]
    fn test_queries_fitting() {
        let n = queries_fitting(Duration::from_secs(10), Duration::from_millis(100));
        assert_eq!(n, 100);
    }
}
