use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use restock_analytics::{improvement_proposals, sort_proposals_by_priority};

use crate::app::{dto, errors};
use crate::context::TenantContext;

/// Improvement proposals, high priority first, optionally narrowed to one category.
pub async fn proposals(
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::KpiProposalRequest>,
) -> axum::response::Response {
    let mut proposals = match improvement_proposals(&body.metrics, &body.targets) {
        Ok(found) => found,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Some(category) = body.category {
        proposals.retain(|p| p.category == category);
    }
    sort_proposals_by_priority(&mut proposals);
    tracing::debug!(tenant = %tenant.tenant_id(), proposals = proposals.len(), "kpi improvement proposals");

    (StatusCode::OK, Json(proposals)).into_response()
}
