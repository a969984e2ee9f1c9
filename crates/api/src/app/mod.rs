//! Axum router and shared state.
//!
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use restock_analytics::AnalyticsConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (used by `main.rs` and the black-box tests).
pub fn build_app(config: AnalyticsConfig) -> Router {
    let config = Arc::new(config);

    // Tenant-scoped routes.
    let scoped = routes::router()
        .layer(Extension(config))
        .layer(axum::middleware::from_fn(middleware::tenant_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/v1", scoped)
        .layer(ServiceBuilder::new())
}
