//! Prometheus text exposition of service metrics

use crate::infra::metrics::{Metrics, MetricsSnapshot, METRICS_BUCKET_BOUNDS, METRICS_NUM_BUCKETS};
use std::fmt::Write;

/// Prometheus metric type
enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
        }
    }
}

/// Write a simple metric (counter or gauge)
fn write_metric(output: &mut String, name: &str, help: &str, typ: MetricType, val: u64) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} {}", typ.as_str());
    let _ = writeln!(output, "{name} {val}");
}

/// Write a histogram metric with buckets, sum, and count
fn write_histogram(
    output: &mut String,
    name: &str,
    help: &str,
    buckets: &[u64; METRICS_NUM_BUCKETS],
    sum: u64,
) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} histogram");

    let mut cumulative = 0u64;
    for (i, &bound) in METRICS_BUCKET_BOUNDS.iter().enumerate() {
        cumulative += buckets[i];
        let _ = writeln!(output, "{name}_bucket{{le=\"{bound}\"}} {cumulative}");
    }
    cumulative += buckets[METRICS_NUM_BUCKETS - 1];
    let _ = writeln!(output, "{name}_bucket{{le=\"+Inf\"}} {cumulative}");

    let count: u64 = buckets.iter().sum();
    let _ = writeln!(output, "{name}_sum {sum}");
    let _ = writeln!(output, "{name}_count {count}");
}

/// Format metrics in Prometheus text exposition format
///
/// Scraping does not reset anything, so every series is cumulative.
pub fn format_prometheus_metrics(metrics: &Metrics) -> String {
    format_snapshot(&metrics.snapshot())
}

fn format_snapshot(snapshot: &MetricsSnapshot) -> String {
    let mut output = String::with_capacity(2048);

    write_metric(
        &mut output,
        "mockservice_pages_total",
        "Total pages served",
        MetricType::Counter,
        snapshot.pages_total,
    );
    write_metric(
        &mut output,
        "mockservice_features_total",
        "Total features emitted",
        MetricType::Counter,
        snapshot.features_total,
    );
    write_metric(
        &mut output,
        "mockservice_update_cycles_total",
        "Full position updates run",
        MetricType::Counter,
        snapshot.update_cycles_total,
    );
    write_metric(
        &mut output,
        "mockservice_assets_advanced_total",
        "Asset positions advanced across all updates",
        MetricType::Counter,
        snapshot.assets_advanced_total,
    );
    write_metric(
        &mut output,
        "mockservice_tracked_assets",
        "Simulated assets",
        MetricType::Gauge,
        snapshot.tracked_assets,
    );
    write_histogram(
        &mut output,
        "mockservice_update_latency_us",
        "Position update latency in microseconds",
        &snapshot.update_lat_buckets,
        snapshot.update_lat_sum_us,
    );

    output
}
