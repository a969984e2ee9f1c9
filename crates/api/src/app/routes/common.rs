use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use restock_analytics::{AnalyticsJob, TenantRunner};

use crate::app::errors;
use crate::context::TenantContext;

/// Run a job on the blocking pool, scoped to the request tenant, and map the
/// outcome to a JSON response.
pub async fn run_scoped<J>(tenant: TenantContext, job: J) -> axum::response::Response
where
    J: AnalyticsJob,
    J::Output: Serialize,
{
    let runner = TenantRunner::new(tenant.tenant_id());
    match tokio::task::spawn_blocking(move || runner.run(job)).await {
        Ok(Ok(output)) => (StatusCode::OK, Json(output)).into_response(),
        Ok(Err(e)) => errors::analytics_error_to_response(e),
        Err(e) => {
            tracing::error!(tenant = %tenant.tenant_id(), error = %e, "analytics job panicked");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "job failed")
        }
    }
}
