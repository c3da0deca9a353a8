//! Tuning advice derived from a metrics report.

use crate::metrics::MetricsReport;

/// Hit rate under which longer TTLs or better keys are suggested.
pub const LOW_HIT_RATE: f64 = 0.5;
/// Average latency above which indexing is suggested.
pub const HIGH_AVERAGE_MS: f64 = 500.0;
/// Slow query count above which query patterns should be reviewed.
pub const MANY_SLOW_QUERIES: usize = 10;

/// Produces human-readable suggestions. Empty reports yield none.
pub fn recommendations(report: &MetricsReport) -> Vec<String> {
    let mut advice = Vec::new();

    if report.total_queries == 0 {
        return advice;
    }

    if report.cache_hit_rate < LOW_HIT_RATE {
        advice.push(format!(
            "Cache hit rate is {:.1}%. Consider increasing TTL values or refining cache key design.",
            report.cache_hit_rate * 100.0
        ));
    }

    if report.average_query_time_ms > HIGH_AVERAGE_MS {
        advice.push(format!(
            "Average query time is {:.1}ms. Consider adding database indexes for frequent queries.",
            report.average_query_time_ms
        ));
    }

    if report.slow_query_count > MANY_SLOW_QUERIES {
        advice.push(format!(
            "{} slow queries detected. Review query patterns and consider pagination or batching.",
            report.slow_query_count
        ));
    }

    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: usize, hit_rate: f64, avg: f64, slow: usize) -> MetricsReport {
        MetricsReport {
            total_queries: total,
            average_query_time_ms: avg,
            cache_hit_rate: hit_rate,
            slow_query_count: slow,
            slow_query_threshold_ms: 1000.0,
            recent_slow_queries: Vec::new(),
        }
    }

    #[test]
    fn test_empty_report_has_no_advice() {
        assert!(recommendations(&report(0, 0.0, 0.0, 0)).is_empty());
    }

    #[test]
    fn test_healthy_report_has_no_advice() {
        assert!(recommendations(&report(100, 0.9, 20.0, 2)).is_empty());
    }

    #[test]
    fn test_low_hit_rate() {
        let advice = recommendations(&report(10, 0.3, 20.0, 0));
        assert_eq!(advice.len(), 1);
        assert!(advice[0].contains("TTL"));
        assert!(advice[0].contains("30.0%"));
    }

    #[test]
    fn test_all_thresholds_exceeded() {
        let advice = recommendations(&report(50, 0.1, 750.0, 11));
        assert_eq!(advice.len(), 3);
        assert!(advice[1].contains("indexes"));
        assert!(advice[2].contains("11 slow queries"));
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert!(recommendations(&report(50, LOW_HIT_RATE, HIGH_AVERAGE_MS, MANY_SLOW_QUERIES)).is_empty());
    }
}
