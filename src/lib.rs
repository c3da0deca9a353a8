//! Query Cache - an in-process cache and optimizer for asynchronous reads
//!
//! Wraps arbitrary read queries with TTL expiry, LRU eviction, tag-based
//! invalidation, pagination and batching helpers, and query metrics.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod optimizer;
pub mod tasks;

pub use api::AppState;
pub use config::{Config, OptimizerConfig};
pub use error::CacheError;
pub use optimizer::{Page, PerformanceReport, QueryOptimizer, QueryOptions};
pub use tasks::spawn_cleanup_task;
