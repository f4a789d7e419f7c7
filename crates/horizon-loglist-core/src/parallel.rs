//! Order-preserving parallel filtering on rayon.
//!
//! Filtering the full record set is the one bulk operation of the engine.
//! [`ParallelFilter`] runs it on rayon's work-stealing pool once the input is
//! large enough to pay for the fan-out, and sequentially otherwise. Both
//! paths return the accepted items in input order.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};

use crate::error::{CoreError, ThreadPoolError};
use crate::logging::{targets, PerfSpan};

/// Default input length at which filtering goes parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Filters slices, in parallel above a size threshold.
#[derive(Clone)]
pub struct ParallelFilter {
    threshold: usize,
    pool: Option<Arc<RayonThreadPool>>,
}

impl ParallelFilter {
    /// Create a filter that runs on rayon's global pool.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            pool: None,
        }
    }

    /// Create a filter backed by a dedicated pool of `num_threads` workers.
    pub fn with_threads(threshold: usize, num_threads: usize) -> Result<Self, CoreError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("loglist-filter-{index}"))
            .build()
            .map_err(|e| ThreadPoolError::CreationFailed(e.to_string()))?;
        Ok(Self {
            threshold,
            pool: Some(Arc::new(pool)),
        })
    }

    /// The input length at which filtering goes parallel.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether an input of `len` items would be filtered in parallel.
    pub fn is_parallel_for(&self, len: usize) -> bool {
        len >= self.threshold
    }

    /// Return clones of the items accepted by `predicate`, in input order.
    pub fn filter<X, P>(&self, items: &[X], predicate: P) -> Vec<X>
    where
        X: Clone + Send + Sync,
        P: Fn(&X) -> bool + Sync + Send,
    {
        if !self.is_parallel_for(items.len()) {
            return items.iter().filter(|x| predicate(x)).cloned().collect();
        }

        let _perf = PerfSpan::new("parallel_filter");
        tracing::debug!(target: targets::FILTER, len = items.len(), "filtering in parallel");
        let run = || {
            items
                .par_iter()
                .filter(|x| predicate(x))
                .cloned()
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

impl Default for ParallelFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PARALLEL_THRESHOLD)
    }
}

impl std::fmt::Debug for ParallelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelFilter")
            .field("threshold", &self.threshold)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_sequential_below_threshold() {
        let filter = ParallelFilter::new(100);
        let items: Vec<u32> = (0..50).collect();
        assert!(!filter.is_parallel_for(items.len()));
        let evens = filter.filter(&items, |x| x % 2 == 0);
        assert_eq!(evens, (0..50).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_preserves_order() {
        let filter = ParallelFilter::new(16);
        let items: Vec<u32> = (0..20_000).collect();
        let kept = filter.filter(&items, |x| x % 7 == 3);
        let expected: Vec<u32> = items.iter().copied().filter(|x| x % 7 == 3).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_dedicated_pool() {
        let filter = ParallelFilter::with_threads(1, 2).unwrap();
        let calls = AtomicUsize::new(0);
        let items: Vec<u32> = (0..1000).collect();
        let kept = filter.filter(&items, |x| {
            calls.fetch_add(1, Ordering::Relaxed);
            *x >= 990
        });
        assert_eq!(kept, (990..1000).collect::<Vec<_>>());
        assert_eq!(calls.load(Ordering::Relaxed), 1000);
    }
}
