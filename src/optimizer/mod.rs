//! Query Optimizer Module
//!
//! The public entry point. Wraps asynchronous read queries with the cache
//! store and records a metric for every call.
//!
//! # Operations
//! - `execute_query` - cached read with TTL and tags
//! - `get_paginated_results` - cached page with a probe item for `has_more`
//! - `execute_bulk_operation` - batched concurrent execution
//! - `invalidate_cache` / `clear_cache` - removal
//! - `get_performance_metrics` - stats, report and recommendations

mod bulk;
mod options;
mod pagination;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::OptimizerConfig;
use crate::error::{CacheError, Result};
use crate::metrics::{recommendations, MetricsCollector, MetricsReport, QueryMetric};
use crate::tasks::spawn_cleanup_task;

pub use bulk::run_in_batches;
pub use options::{QueryOptions, DEFAULT_OPERATION};
pub use pagination::{page_cache_key, page_window, Page};

/// Type-erased cached result. Call sites recover their own type by downcast.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

// == Performance Report ==
/// Everything `get_performance_metrics` returns.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub cache: CacheStats,
    pub queries: MetricsReport,
    pub recommendations: Vec<String>,
}

// == Query Optimizer ==
/// Shared query cache. Cloning is cheap and every clone sees the same state.
///
/// Concurrent misses on the same key are not coalesced: each caller runs its
/// own producer and the last write wins.
#[derive(Clone)]
pub struct QueryOptimizer {
    cache: Arc<RwLock<CacheStore<CachedValue>>>,
    metrics: Arc<RwLock<MetricsCollector>>,
    config: OptimizerConfig,
}

impl QueryOptimizer {
    // == Constructor ==
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;

        info!(
            max_entries = config.max_entries,
            default_ttl = config.default_ttl,
            max_metrics = config.max_metrics,
            "query optimizer created"
        );

        Ok(Self {
            cache: Arc::new(RwLock::new(CacheStore::new(config.max_entries))),
            metrics: Arc::new(RwLock::new(MetricsCollector::new(
                config.max_metrics,
                config.slow_query_threshold_ms,
            ))),
            config,
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    // == Execute Query ==
    /// Returns the cached result for `cache_key`, or runs `producer` and caches it.
    ///
    /// The producer runs at most once and its error is returned unchanged;
    /// failed attempts are recorded as misses but never cached. A TTL of zero
    /// is rejected before anything else happens. If the result cannot be
    /// stored, it is still returned.
    pub async fn execute_query<T, E, F, Fut>(
        &self,
        producer: F,
        cache_key: &str,
        options: QueryOptions,
    ) -> std::result::Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let ttl = options.ttl.unwrap_or(self.config.default_ttl);
        if ttl == 0 {
            return Err(CacheError::InvalidConfiguration("ttl must be positive".to_string()).into());
        }

        if options.enabled {
            let started = Instant::now();
            if let Some(value) = self.lookup::<T>(cache_key).await {
                self.record(started, true, &options.operation, cache_key).await;
                debug!(key = cache_key, "cache hit");
                return Ok(value);
            }
        }

        let started = Instant::now();
        let outcome = producer().await;
        self.record(started, false, &options.operation, cache_key).await;
        let value = outcome?;

        if options.enabled {
            let stored: CachedValue = Arc::new(value.clone());
            let written = self
                .cache
                .write()
                .await
                .set(cache_key, stored, ttl, options.tags.as_slice());
            match written {
                Ok(()) => debug!(key = cache_key, ttl, "cache miss, result stored"),
                Err(err) => warn!(key = cache_key, error = %err, "result not cached"),
            }
        }

        Ok(value)
    }

    // == Paginated Results ==
    /// Fetches 1-based `page` through `producer(skip, take)`, cached under
    /// `{prefix}:page:{page}:size:{page_size}` with the pagination TTL.
    pub async fn get_paginated_results<T, E, F, Fut>(
        &self,
        producer: F,
        page: usize,
        page_size: usize,
        cache_key_prefix: &str,
    ) -> std::result::Result<Page<T>, E>
    where
        T: Clone + Send + Sync + 'static,
        E: From<CacheError>,
        F: FnOnce(usize, usize) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<T>, E>>,
    {
        let options = QueryOptions::new().with_ttl(self.config.pagination_ttl);
        self.get_paginated_results_with(producer, page, page_size, cache_key_prefix, options)
            .await
    }

    /// Like `get_paginated_results` with explicit options, e.g. to attach tags.
    pub async fn get_paginated_results_with<T, E, F, Fut>(
        &self,
        producer: F,
        page: usize,
        page_size: usize,
        cache_key_prefix: &str,
        options: QueryOptions,
    ) -> std::result::Result<Page<T>, E>
    where
        T: Clone + Send + Sync + 'static,
        E: From<CacheError>,
        F: FnOnce(usize, usize) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<T>, E>>,
    {
        let (skip, take) = page_window(page, page_size)?;
        let key = page_cache_key(cache_key_prefix, page, page_size);

        let items = self
            .execute_query(move || producer(skip, take), &key, options)
            .await?;

        Ok(Page::from_probe(items, page_size))
    }

    // == Bulk Operation ==
    /// Runs independent operations in concurrent batches of `batch_size`,
    /// returning results in input order.
    pub async fn execute_bulk_operation<T, E, F, Fut>(
        &self,
        operations: Vec<F>,
        batch_size: usize,
    ) -> std::result::Result<Vec<T>, E>
    where
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        run_in_batches(operations, batch_size).await
    }

    // == Invalidation ==
    /// Removes every cached result carrying one of `tags`.
    pub async fn invalidate_cache<S: AsRef<str>>(&self, tags: &[S]) -> usize {
        let removed = self.cache.write().await.invalidate(tags);
        debug!(removed, "cache invalidated by tags");
        removed
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        debug!("cache cleared");
    }

    // == Performance Metrics ==
    pub async fn get_performance_metrics(&self) -> PerformanceReport {
        let cache = self.cache.read().await.stats();
        let queries = self.metrics.read().await.report();
        let recommendations = recommendations(&queries);

        PerformanceReport {
            cache,
            queries,
            recommendations,
        }
    }

    // == Lifecycle ==
    /// Starts the periodic expired-entry sweep. Abort the handle on shutdown.
    pub fn spawn_cleanup_task(&self, interval_secs: u64) -> JoinHandle<()> {
        spawn_cleanup_task(self.cache.clone(), interval_secs)
    }

    /// Drops all cached results and metrics.
    pub async fn close(&self) {
        self.cache.write().await.clear();
        self.metrics.write().await.clear();
        info!("query optimizer closed");
    }

    async fn lookup<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        let mut cache = self.cache.write().await;
        let mut mismatched = false;
        let cached = cache.get_if(key, |value| {
            mismatched = !value.is::<T>();
            !mismatched
        });
        drop(cache);

        if mismatched {
            warn!(key, "cached value has a different type, treating as miss");
        }
        cached.and_then(|value| value.downcast_ref::<T>().cloned())
    }

    async fn record(&self, started: Instant, cache_hit: bool, operation: &str, key: &str) {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let metric = QueryMetric::new(elapsed_ms, cache_hit, operation, key);
        self.metrics.write().await.record(metric);
    }
}
