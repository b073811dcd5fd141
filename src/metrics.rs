//! Performance metrics for completion and hover queries.
//!
//! Metrics live in memory and can be read by the host for diagnostics or
//! periodic logging.
//!
//! ## Metrics tracked
//!
//! - Parse cache hit rate
//! - Completion/hover query counts
//! - Slow queries (soft 200 ms latency target exceeded) and cancellations
//! - Query latency histograms
//!
//! ## Design
//!
//! - Lock-free atomic counters for high-frequency operations
//! - DashMap for low-contention histogram storage

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Global metrics registry (singleton)
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// Get the global metrics instance
pub fn metrics() -> &'static Arc<Metrics> {
    &METRICS
}

#[derive(Debug)]
pub struct Metrics {
    parse_cache_hits: AtomicU64,
    parse_cache_misses: AtomicU64,

    completion_count: AtomicU64,
    hover_count: AtomicU64,

    slow_queries: AtomicU64,
    cancelled_queries: AtomicU64,

    // Operation name -> durations in microseconds
    operation_timings: DashMap<String, Vec<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            parse_cache_hits: AtomicU64::new(0),
            parse_cache_misses: AtomicU64::new(0),
            completion_count: AtomicU64::new(0),
            hover_count: AtomicU64::new(0),
            slow_queries: AtomicU64::new(0),
            cancelled_queries: AtomicU64::new(0),
            operation_timings: DashMap::new(),
        }
    }

    pub fn record_parse_cache_hit(&self) {
        self.parse_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_cache_miss(&self) {
        self.parse_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Parse cache hit rate (0.0 to 1.0)
    pub fn parse_cache_hit_rate(&self) -> f64 {
        let hits = self.parse_cache_hits.load(Ordering::Relaxed);
        let misses = self.parse_cache_misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_completion(&self) {
        self.completion_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hover(&self) {
        self.hover_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_slow_query(&self) {
        self.slow_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled_query(&self) {
        self.cancelled_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the timing of an operation
    pub fn record_timing(&self, operation: &str, duration: Duration) {
        let micros = duration.as_micros() as u64;
        self.operation_timings
            .entry(operation.to_string())
            .or_default()
            .push(micros);
    }

    /// Summary statistics for one operation
    pub fn operation_stats(&self, operation: &str) -> Option<OperationStats> {
        self.operation_timings.get(operation).map(|timings| {
            let mut sorted = timings.value().clone();
            sorted.sort_unstable();

            let count = sorted.len();
            if count == 0 {
                return OperationStats::default();
            }

            let sum: u64 = sorted.iter().sum();
            let p50_idx = count / 2;
            let p95_idx = (count as f64 * 0.95) as usize;
            let p99_idx = (count as f64 * 0.99) as usize;

            OperationStats {
                count,
                min_micros: sorted[0],
                max_micros: sorted[count - 1],
                mean_micros: sum / count as u64,
                p50_micros: sorted[p50_idx],
                p95_micros: sorted[p95_idx.min(count - 1)],
                p99_micros: sorted[p99_idx.min(count - 1)],
            }
        })
    }

    /// Snapshot of all counters
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            parse_cache_hits: self.parse_cache_hits.load(Ordering::Relaxed),
            parse_cache_misses: self.parse_cache_misses.load(Ordering::Relaxed),
            parse_cache_hit_rate: self.parse_cache_hit_rate(),
            completion_count: self.completion_count.load(Ordering::Relaxed),
            hover_count: self.hover_count.load(Ordering::Relaxed),
            slow_queries: self.slow_queries.load(Ordering::Relaxed),
            cancelled_queries: self.cancelled_queries.load(Ordering::Relaxed),
        }
    }

    /// Resets all metrics (useful for testing)
    pub fn reset(&self) {
        self.parse_cache_hits.store(0, Ordering::Relaxed);
        self.parse_cache_misses.store(0, Ordering::Relaxed);
        self.completion_count.store(0, Ordering::Relaxed);
        self.hover_count.store(0, Ordering::Relaxed);
        self.slow_queries.store(0, Ordering::Relaxed);
        self.cancelled_queries.store(0, Ordering::Relaxed);
        self.operation_timings.clear();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single operation
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    pub count: usize,
    pub min_micros: u64,
    pub max_micros: u64,
    pub mean_micros: u64,
    pub p50_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
}

/// Snapshot of all counters
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub parse_cache_hits: u64,
    pub parse_cache_misses: u64,
    pub parse_cache_hit_rate: f64,
    pub completion_count: u64,
    pub hover_count: u64,
    pub slow_queries: u64,
    pub cancelled_queries: u64,
}

/// RAII guard recording the duration of a scope into the global registry
/// when dropped.
pub struct TimingGuard {
    operation: String,
    start: Instant,
}

impl TimingGuard {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
        }
    }

    /// Elapsed time so far, without consuming the guard.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        metrics().record_timing(&self.operation, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn parse_cache_hit_rate() {
        let m = Metrics::new();
        assert_eq!(m.parse_cache_hit_rate(), 0.0);

        m.record_parse_cache_hit();
        m.record_parse_cache_hit();
        m.record_parse_cache_miss();
        assert_eq!(m.parse_cache_hit_rate(), 2.0 / 3.0);
    }

    #[test]
    fn query_counters() {
        let m = Metrics::new();
        m.record_completion();
        m.record_completion();
        m.record_hover();
        m.record_slow_query();

        let summary = m.summary();
        assert_eq!(summary.completion_count, 2);
        assert_eq!(summary.hover_count, 1);
        assert_eq!(summary.slow_queries, 1);
        assert_eq!(summary.cancelled_queries, 0);
    }

    #[test]
    fn operation_timing_stats() {
        let m = Metrics::new();
        m.record_timing("completion", Duration::from_micros(100));
        m.record_timing("completion", Duration::from_micros(200));
        m.record_timing("completion", Duration::from_micros(150));

        let stats = m.operation_stats("completion").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min_micros, 100);
        assert_eq!(stats.max_micros, 200);
        assert_eq!(stats.mean_micros, 150);
        assert_eq!(stats.p50_micros, 150);
    }

    #[test]
    fn timing_guard_records_on_drop() {
        {
            let _guard = TimingGuard::new("guard_test");
            thread::sleep(Duration::from_millis(10));
        }

        let stats = metrics().operation_stats("guard_test").unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.min_micros >= 10_000);
    }

    #[test]
    fn reset_clears_everything() {
        let m = Metrics::new();
        m.record_parse_cache_hit();
        m.record_completion();
        m.record_timing("x", Duration::from_micros(10));

        m.reset();
        let summary = m.summary();
        assert_eq!(summary.parse_cache_hits, 0);
        assert_eq!(summary.completion_count, 0);
        assert!(m.operation_stats("x").is_none());
    }
}
