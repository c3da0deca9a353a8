//! API Module
//!
//! Admin HTTP surface over the query optimizer.
//!
//! # Endpoints
//! - `GET /metrics` - Performance report with recommendations
//! - `POST /invalidate` - Invalidate cached results by tag
//! - `DELETE /cache` - Clear the whole cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
