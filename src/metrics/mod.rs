//! Metrics Module
//!
//! Query performance observations and the advice derived from them.

mod collector;
mod recommendations;

pub use collector::{MetricsCollector, MetricsReport, QueryMetric, RECENT_SLOW_QUERY_LIMIT};
pub use recommendations::{recommendations, HIGH_AVERAGE_MS, LOW_HIT_RATE, MANY_SLOW_QUERIES};
