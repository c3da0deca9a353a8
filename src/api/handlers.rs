//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use axum::{extract::State, Json};
use tracing::info;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{ClearResponse, HealthResponse, InvalidateRequest, InvalidateResponse};
use crate::optimizer::{PerformanceReport, QueryOptimizer};

/// Application state shared across all handlers.
///
/// The optimizer is internally synchronized and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub optimizer: QueryOptimizer,
}

impl AppState {
    /// Creates a new AppState around an existing optimizer.
    pub fn new(optimizer: QueryOptimizer) -> Self {
        Self { optimizer }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(QueryOptimizer::new(config.optimizer.clone())?))
    }
}

/// Handler for GET /metrics
///
/// Returns cache stats, the query metrics report and recommendations.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<PerformanceReport> {
    Json(state.optimizer.get_performance_metrics().await)
}

/// Handler for POST /invalidate
///
/// Drops every cached result carrying one of the given tags.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let invalidated = state.optimizer.invalidate_cache(req.tags.as_slice()).await;
    info!(invalidated, tags = ?req.tags, "cache invalidated via admin API");

    Ok(Json(InvalidateResponse::new(invalidated, req.tags)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.optimizer.clear_cache().await;
    info!("cache cleared via admin API");
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
