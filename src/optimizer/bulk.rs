//! Bounded-concurrency batch execution.

use std::future::Future;

use futures::future::join_all;
use tracing::debug;

use crate::error::CacheError;

/// Runs `operations` in batches of `batch_size`.
///
/// Operations in a batch run concurrently and the whole batch is awaited
/// before the next one starts. Results keep the input order. When a batch
/// contains failures, the first failure in input order is returned and no
/// further batches are started.
pub async fn run_in_batches<T, E, F, Fut>(operations: Vec<F>, batch_size: usize) -> Result<Vec<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<CacheError>,
{
    if batch_size == 0 {
        return Err(CacheError::InvalidConfiguration("batch_size must be positive".to_string()).into());
    }

    let total = operations.len();
    let mut results = Vec::with_capacity(total);
    let mut pending = operations.into_iter();

    loop {
        let batch: Vec<Fut> = pending.by_ref().take(batch_size).map(|op| op()).collect();
        if batch.is_empty() {
            break;
        }

        debug!(
            batch_len = batch.len(),
            completed = results.len(),
            total,
            "running bulk batch"
        );

        for outcome in join_all(batch).await {
            results.push(outcome?);
        }
    }

    Ok(results)
}
