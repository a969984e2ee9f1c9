use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use restock_analytics::AnalyticsError;
use restock_core::DomainError;
use restock_forecast::ForecastError;

pub fn analytics_error_to_response(err: AnalyticsError) -> axum::response::Response {
    match err {
        AnalyticsError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        AnalyticsError::Domain(e) => domain_error_to_response(e),
        AnalyticsError::Forecast(ForecastError::Domain(e)) => domain_error_to_response(e),
        AnalyticsError::Forecast(e) => json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
        AnalyticsError::ItemAborted(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "item_aborted", msg)
        }
        AnalyticsError::TenantScope => json_error(
            StatusCode::FORBIDDEN,
            "tenant_isolation",
            "job tenant not allowed in this scope",
        ),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
