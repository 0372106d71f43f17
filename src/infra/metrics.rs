//! Lock-free counters for paging and position updates
//!
//! Recording never takes a lock. Two read paths exist: `report()` drains the
//! periodic counters for the log line, and `snapshot()` reads the cumulative
//! ones for Prometheus scrapes without resetting anything.
//!
//! Every atomic here uses Relaxed ordering. The values are statistics and
//! nothing branches on them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Prometheus-style exponential bucket boundaries (microseconds)
/// Buckets: ≤100, ≤200, ≤400, ≤800, ≤1600, ≤3200, ≤6400, ≤12800, ≤25600, ≤51200, >51200
const BUCKET_BOUNDS: [u64; 10] = [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200];
const NUM_BUCKETS: usize = 11;

/// Compute bucket index for a latency value using binary search
#[inline]
fn bucket_index(latency_us: u64) -> usize {
    BUCKET_BOUNDS.partition_point(|&bound| bound < latency_us)
}

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Swap all buckets to zero and return their values
#[inline]
fn swap_buckets(buckets: &[AtomicU64; NUM_BUCKETS]) -> [u64; NUM_BUCKETS] {
    let mut result = [0u64; NUM_BUCKETS];
    for (i, bucket) in buckets.iter().enumerate() {
        result[i] = bucket.swap(0, Ordering::Relaxed);
    }
    result
}

/// Read all buckets without resetting them
#[inline]
fn load_buckets(buckets: &[AtomicU64; NUM_BUCKETS]) -> [u64; NUM_BUCKETS] {
    let mut result = [0u64; NUM_BUCKETS];
    for (i, bucket) in buckets.iter().enumerate() {
        result[i] = bucket.load(Ordering::Relaxed);
    }
    result
}

/// Compute percentile from histogram buckets
/// Returns the upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    // Rank of the sample we want, 1-based so an empty leading bucket never matches
    let target = ((total as f64 * percentile).ceil() as u64).max(1);
    let mut cumulative = 0u64;

    // Upper bounds for each bucket (last bucket uses 2x the previous bound)
    const BUCKET_UPPER_BOUNDS: [u64; NUM_BUCKETS] =
        [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200, 102400];

    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[NUM_BUCKETS - 1]
}

/// Lock-free metrics collector
///
/// All recording operations are lock-free using atomics.
/// `report()` swaps the periodic counters to zero; `snapshot()` only loads.
pub struct Metrics {
    /// Total pages served (monotonic)
    pages_total: AtomicU64,
    /// Pages since last report (reset on report)
    pages_since_report: AtomicU64,
    /// Total features emitted across all pages (monotonic)
    features_total: AtomicU64,
    /// Full position updates run (monotonic)
    update_cycles_total: AtomicU64,
    /// Assets advanced across all updates (monotonic)
    assets_advanced_total: AtomicU64,
    /// Update latency histogram buckets (reset on report)
    update_latency_buckets: [AtomicU64; NUM_BUCKETS],
    /// Sum of update latencies in microseconds (reset on report)
    update_latency_sum_us: AtomicU64,
    /// Max update latency in microseconds (reset on report)
    update_latency_max_us: AtomicU64,
    /// Update latency histogram buckets since start (monotonic)
    update_latency_buckets_total: [AtomicU64; NUM_BUCKETS],
    /// Sum of update latencies since start (monotonic)
    update_latency_sum_total_us: AtomicU64,
    /// Updates since last report (reset on report)
    updates_since_report: AtomicU64,
    /// Currently tracked assets (set on initialize)
    tracked_assets: AtomicU64,
    /// Last report time (only accessed from reporter, not atomic)
    last_report_time: parking_lot::Mutex<Instant>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            pages_total: AtomicU64::new(0),
            pages_since_report: AtomicU64::new(0),
            features_total: AtomicU64::new(0),
            update_cycles_total: AtomicU64::new(0),
            assets_advanced_total: AtomicU64::new(0),
            update_latency_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            update_latency_sum_us: AtomicU64::new(0),
            update_latency_max_us: AtomicU64::new(0),
            update_latency_buckets_total: std::array::from_fn(|_| AtomicU64::new(0)),
            update_latency_sum_total_us: AtomicU64::new(0),
            updates_since_report: AtomicU64::new(0),
            tracked_assets: AtomicU64::new(0),
            last_report_time: parking_lot::Mutex::new(Instant::now()),
        }
    }

    /// Record a page was served with `features` entries (lock-free)
    #[inline]
    pub fn record_page(&self, features: usize) {
        self.pages_total.fetch_add(1, Ordering::Relaxed);
        self.pages_since_report.fetch_add(1, Ordering::Relaxed);
        self.features_total.fetch_add(features as u64, Ordering::Relaxed);
    }

    /// Record a full position update over `advanced` assets (lock-free)
    #[inline]
    pub fn record_update(&self, advanced: usize, latency_us: u64) {
        self.update_cycles_total.fetch_add(1, Ordering::Relaxed);
        self.assets_advanced_total.fetch_add(advanced as u64, Ordering::Relaxed);
        self.updates_since_report.fetch_add(1, Ordering::Relaxed);
        self.update_latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);

        self.update_latency_sum_total_us.fetch_add(latency_us, Ordering::Relaxed);

        let bucket = bucket_index(latency_us);
        self.update_latency_buckets[bucket].fetch_add(1, Ordering::Relaxed);
        self.update_latency_buckets_total[bucket].fetch_add(1, Ordering::Relaxed);

        update_atomic_max(&self.update_latency_max_us, latency_us);
    }

    #[inline]
    pub fn set_tracked_assets(&self, count: usize) {
        self.tracked_assets.store(count as u64, Ordering::Relaxed);
    }

    pub fn pages_total(&self) -> u64 {
        self.pages_total.load(Ordering::Relaxed)
    }

    pub fn update_cycles_total(&self) -> u64 {
        self.update_cycles_total.load(Ordering::Relaxed)
    }

    /// Read the cumulative counters, leaving every counter untouched
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_total: self.pages_total.load(Ordering::Relaxed),
            features_total: self.features_total.load(Ordering::Relaxed),
            update_cycles_total: self.update_cycles_total.load(Ordering::Relaxed),
            assets_advanced_total: self.assets_advanced_total.load(Ordering::Relaxed),
            tracked_assets: self.tracked_assets.load(Ordering::Relaxed),
            update_lat_buckets: load_buckets(&self.update_latency_buckets_total),
            update_lat_sum_us: self.update_latency_sum_total_us.load(Ordering::Relaxed),
        }
    }

    /// Generate a summary and reset periodic counters
    pub fn report(&self) -> MetricsSummary {
        let pages_count = self.pages_since_report.swap(0, Ordering::Relaxed);
        let update_count = self.updates_since_report.swap(0, Ordering::Relaxed);
        let latency_sum = self.update_latency_sum_us.swap(0, Ordering::Relaxed);
        let max_latency = self.update_latency_max_us.swap(0, Ordering::Relaxed);
        let update_lat_buckets = swap_buckets(&self.update_latency_buckets);

        let elapsed = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };

        let pages_per_sec = if elapsed.as_secs_f64() > 0.0 {
            pages_count as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let avg_latency = if update_count > 0 { latency_sum / update_count } else { 0 };

        MetricsSummary {
            pages_total: self.pages_total.load(Ordering::Relaxed),
            pages_per_sec,
            features_total: self.features_total.load(Ordering::Relaxed),
            update_cycles_total: self.update_cycles_total.load(Ordering::Relaxed),
            assets_advanced_total: self.assets_advanced_total.load(Ordering::Relaxed),
            tracked_assets: self.tracked_assets.load(Ordering::Relaxed),
            update_lat_avg_us: avg_latency,
            update_lat_max_us: max_latency,
            update_lat_p50_us: percentile_from_buckets(&update_lat_buckets, 0.50),
            update_lat_p99_us: percentile_from_buckets(&update_lat_buckets, 0.99),
            update_lat_buckets,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of histogram buckets (exported for Prometheus formatting)
pub const METRICS_NUM_BUCKETS: usize = NUM_BUCKETS;

/// Exported bucket bounds for Prometheus formatting
pub const METRICS_BUCKET_BOUNDS: [u64; 10] = BUCKET_BOUNDS;

/// Cumulative view for Prometheus; histogram values only ever grow
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub pages_total: u64,
    pub features_total: u64,
    pub update_cycles_total: u64,
    pub assets_advanced_total: u64,
    pub tracked_assets: u64,
    pub update_lat_buckets: [u64; NUM_BUCKETS],
    pub update_lat_sum_us: u64,
}

#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub pages_total: u64,
    pub pages_per_sec: f64,
    pub features_total: u64,
    pub update_cycles_total: u64,
    pub assets_advanced_total: u64,
    pub tracked_assets: u64,
    /// Update latency histogram buckets
    /// Bounds: ≤100, ≤200, ≤400, ≤800, ≤1600, ≤3200, ≤6400, ≤12800, ≤25600, ≤51200, >51200 µs
    pub update_lat_buckets: [u64; NUM_BUCKETS],
    pub update_lat_avg_us: u64,
    pub update_lat_max_us: u64,
    pub update_lat_p50_us: u64,
    pub update_lat_p99_us: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            pages_total = %self.pages_total,
            pages_per_sec = format!("{:.1}", self.pages_per_sec),
            features_total = %self.features_total,
            update_cycles = %self.update_cycles_total,
            tracked_assets = %self.tracked_assets,
            update_avg_us = %self.update_lat_avg_us,
            update_max_us = %self.update_lat_max_us,
            update_p99_us = %self.update_lat_p99_us,
            "metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.pages_total(), 0);
        assert_eq!(metrics.update_cycles_total(), 0);
    }

    #[test]
    fn test_record_page() {
        let metrics = Metrics::new();

        metrics.record_page(10);
        metrics.record_page(4);
        assert_eq!(metrics.pages_total(), 2);
        assert_eq!(metrics.features_total.load(Ordering::Relaxed), 14);
    }

    #[test]
    fn test_report() {
        let metrics = Metrics::new();
        metrics.set_tracked_assets(25);

        metrics.record_update(25, 100);
        metrics.record_update(25, 300);
        metrics.record_page(10);

        let summary = metrics.report();

        assert_eq!(summary.pages_total, 1);
        assert_eq!(summary.update_cycles_total, 2);
        assert_eq!(summary.assets_advanced_total, 50);
        assert_eq!(summary.tracked_assets, 25);
        assert_eq!(summary.update_lat_avg_us, 200);
        assert_eq!(summary.update_lat_max_us, 300);

        // Periodic counters should be reset, monotonic ones kept
        assert_eq!(metrics.updates_since_report.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.update_latency_max_us.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.update_cycles_total(), 2);
    }

    #[test]
    fn test_report_empty() {
        let summary = Metrics::new().report();
        assert_eq!(summary.pages_total, 0);
        assert_eq!(summary.update_lat_avg_us, 0);
        assert_eq!(summary.update_lat_p99_us, 0);
    }

    #[test]
    fn test_percentile_single_slow_update() {
        let metrics = Metrics::new();
        metrics.record_update(1, 40_000);

        let summary = metrics.report();
        assert_eq!(summary.update_lat_p50_us, 51_200);
        assert_eq!(summary.update_lat_p99_us, 51_200);
        assert_eq!(summary.update_lat_max_us, 40_000);
    }

    #[test]
    fn test_percentile_small_totals() {
        let mut buckets = [0u64; NUM_BUCKETS];
        buckets[1] = 1;
        buckets[6] = 1;
        // Two samples: the median is the first, p99 the second
        assert_eq!(percentile_from_buckets(&buckets, 0.50), 200);
        assert_eq!(percentile_from_buckets(&buckets, 0.99), 6_400);
    }

    #[test]
    fn test_snapshot_survives_report() {
        let metrics = Metrics::new();
        metrics.record_update(4, 150);
        metrics.record_update(4, 3_000);
        metrics.record_page(4);

        let _ = metrics.report();
        let first = metrics.snapshot();
        let second = metrics.snapshot();

        assert_eq!(first.update_lat_buckets[1], 1);
        assert_eq!(first.update_lat_buckets[5], 1);
        assert_eq!(first.update_lat_sum_us, 3_150);
        assert_eq!(second.update_lat_buckets, first.update_lat_buckets);
        assert_eq!(second.pages_total, 1);

        metrics.record_update(4, 90);
        let third = metrics.snapshot();
        assert_eq!(third.update_lat_buckets[0], 1);
        assert_eq!(third.update_lat_buckets.iter().sum::<u64>(), 3);
        assert_eq!(third.update_lat_sum_us, 3_240);
    }

    #[test]
    fn test_bucket_index() {
        assert_eq!(bucket_index(50), 0);
        assert_eq!(bucket_index(100), 0);
        assert_eq!(bucket_index(101), 1);
        assert_eq!(bucket_index(100_000), NUM_BUCKETS - 1);
    }
}
