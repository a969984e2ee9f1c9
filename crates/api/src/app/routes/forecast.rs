use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use restock_analytics::{AnalyticsConfig, ForecastJob};
use restock_forecast::{ForecastRequest, forecast_with_method};

use crate::app::routes::common::run_scoped;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub async fn forecast(
    Extension(config): Extension<Arc<AnalyticsConfig>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::ForecastBody>,
) -> axum::response::Response {
    let periods = body.periods.unwrap_or(config.forecast_periods);

    if let Some(parameters) = body.parameters {
        if periods == 0 {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", "periods must be at least 1");
        }
        let result = forecast_with_method(&body.history, periods, &parameters);
        return (StatusCode::OK, Json(result)).into_response();
    }

    let request = ForecastRequest::new(body.history, periods).with_grade(body.xyz_grade);
    run_scoped(tenant, ForecastJob::new(tenant.tenant_id(), request)).await
}
