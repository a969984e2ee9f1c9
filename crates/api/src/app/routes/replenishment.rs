use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use restock_analytics::{
    AnalyticsConfig, BatchRequest, InventoryOptimizer, ReplenishmentJob, summarize,
};

use crate::app::routes::common::run_scoped;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub async fn evaluate(
    Extension(config): Extension<Arc<AnalyticsConfig>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::EvaluateRequest>,
) -> axum::response::Response {
    let mut config = (*config).clone();
    if let Some(scheme) = body.ranking_scheme {
        config = config.with_ranking_scheme(scheme);
    }

    let tenant_id = tenant.tenant_id();
    let batch = BatchRequest {
        tenant_id,
        items: body.items,
    };
    run_scoped(tenant, ReplenishmentJob::new(tenant_id, batch).with_config(config)).await
}

pub async fn advise(
    Extension(config): Extension<Arc<AnalyticsConfig>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::AdviseRequest>,
) -> axum::response::Response {
    let optimizer = InventoryOptimizer::from_config(&config);

    let mut advisories = Vec::new();
    for input in &body.items {
        match optimizer.advise(input) {
            Ok(found) => advisories.extend(found),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }
    advisories.sort_by_key(|a| a.priority);
    tracing::debug!(tenant = %tenant.tenant_id(), advisories = advisories.len(), "optimization advisories");

    let summary = summarize(&advisories);
    (StatusCode::OK, Json(dto::AdviseResponse { advisories, summary })).into_response()
}
