use axum::{Json, extract::Extension};

use restock_analytics::ClassificationJob;

use crate::app::dto;
use crate::app::routes::common::run_scoped;
use crate::context::TenantContext;

pub async fn classify(
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::ClassifyRequest>,
) -> axum::response::Response {
    let mut job = ClassificationJob::new(tenant.tenant_id(), body.items);
    if let Some(thresholds) = body.thresholds {
        job = job.with_thresholds(thresholds);
    }
    run_scoped(tenant, job).await
}
