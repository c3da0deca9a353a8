//! Metrics Collector
//!
//! Bounded ring of recent query observations with derived statistics.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of slow queries included in a report.
pub const RECENT_SLOW_QUERY_LIMIT: usize = 10;

// == Query Metric ==
/// One observed `execute_query` call. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetric {
    /// Wall-clock duration of the call in milliseconds
    pub query_time_ms: f64,
    /// Whether the result came from the cache
    pub cache_hit: bool,
    /// Short label for the kind of query, e.g. "SELECT"
    pub operation: String,
    /// Cache key the call was made with
    pub cache_key: String,
    pub recorded_at: DateTime<Utc>,
}

impl QueryMetric {
    pub fn new(
        query_time_ms: f64,
        cache_hit: bool,
        operation: impl Into<String>,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            query_time_ms: query_time_ms.max(0.0),
            cache_hit,
            operation: operation.into(),
            cache_key: cache_key.into(),
            recorded_at: Utc::now(),
        }
    }
}

// == Metrics Report ==
/// Snapshot of the collector's derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub total_queries: usize,
    pub average_query_time_ms: f64,
    pub cache_hit_rate: f64,
    pub slow_query_count: usize,
    pub slow_query_threshold_ms: f64,
    /// Most recent slow queries, oldest first
    pub recent_slow_queries: Vec<QueryMetric>,
}

// == Metrics Collector ==
/// Keeps the last `max_metrics` observations in arrival order.
#[derive(Debug)]
pub struct MetricsCollector {
    metrics: VecDeque<QueryMetric>,
    max_metrics: usize,
    slow_query_threshold_ms: f64,
}

impl MetricsCollector {
    // == Constructor ==
    pub fn new(max_metrics: usize, slow_query_threshold_ms: f64) -> Self {
        Self {
            metrics: VecDeque::with_capacity(max_metrics.min(1024)),
            max_metrics,
            slow_query_threshold_ms,
        }
    }

    // == Record ==
    /// Appends a metric, dropping the oldest one when the ring is full.
    pub fn record(&mut self, metric: QueryMetric) {
        if self.max_metrics == 0 {
            return;
        }
        while self.metrics.len() >= self.max_metrics {
            self.metrics.pop_front();
        }
        self.metrics.push_back(metric);
    }

    // == Average Query Time ==
    /// Mean query time over retained metrics, 0 when empty.
    pub fn average_query_time_ms(&self) -> f64 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        let total: f64 = self.metrics.iter().map(|m| m.query_time_ms).sum();
        total / self.metrics.len() as f64
    }

    // == Cache Hit Rate ==
    /// Fraction of retained metrics that were cache hits, 0 when empty.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        let hits = self.metrics.iter().filter(|m| m.cache_hit).count();
        hits as f64 / self.metrics.len() as f64
    }

    // == Slow Queries ==
    /// Retained metrics slower than `threshold_ms`, in recorded order.
    pub fn slow_queries(&self, threshold_ms: f64) -> Vec<QueryMetric> {
        self.metrics
            .iter()
            .filter(|m| m.query_time_ms > threshold_ms)
            .cloned()
            .collect()
    }

    // == Report ==
    pub fn report(&self) -> MetricsReport {
        let slow = self.slow_queries(self.slow_query_threshold_ms);
        let recent_start = slow.len().saturating_sub(RECENT_SLOW_QUERY_LIMIT);

        MetricsReport {
            total_queries: self.metrics.len(),
            average_query_time_ms: self.average_query_time_ms(),
            cache_hit_rate: self.cache_hit_rate(),
            slow_query_count: slow.len(),
            slow_query_threshold_ms: self.slow_query_threshold_ms,
            recent_slow_queries: slow[recent_start..].to_vec(),
        }
    }

    /// Iterates retained metrics, oldest first.
    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &QueryMetric> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn clear(&mut self) {
        self.metrics.clear();
    }
}
