use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use restock_analytics::AnalyticsConfig;
use restock_core::DomainResult;
use restock_policy::{
    HoldingCostInput, SimulationInput, compare_order_quantity_cost, eoq_with_discounts,
    run_scenario_simulation,
};

use crate::app::{dto, errors};
use crate::context::TenantContext;

pub async fn eoq(
    Extension(config): Extension<Arc<AnalyticsConfig>>,
    Extension(_tenant): Extension<TenantContext>,
    Json(body): Json<dto::EoqRequest>,
) -> axum::response::Response {
    let holding = match (body.holding_cost_per_unit, body.unit_cost) {
        (Some(h), _) => h,
        (None, Some(cost)) => match HoldingCostInput::new(cost)
            .with_holding_rate(config.holding_rate)
            .annual_cost()
        {
            Ok(h) => h,
            Err(e) => return errors::domain_error_to_response(e),
        },
        (None, None) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_input",
                "either holding_cost_per_unit or unit_cost is required",
            );
        }
    };
    let ordering_cost = body.ordering_cost.unwrap_or(config.ordering_cost);

    match compute_eoq(&body, ordering_cost, holding, config.holding_rate) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn compute_eoq(
    body: &dto::EoqRequest,
    ordering_cost: f64,
    holding: f64,
    holding_rate: f64,
) -> DomainResult<dto::EoqResponse> {
    let result = restock_policy::eoq(body.annual_demand, ordering_cost, holding)?;
    let comparison = body
        .current_order_quantity
        .map(|q| compare_order_quantity_cost(&result, q, body.annual_demand, ordering_cost, holding))
        .transpose()?;
    let discounted = eoq_with_discounts(body.annual_demand, ordering_cost, holding_rate, &body.discount_brackets)?;

    Ok(dto::EoqResponse {
        holding_cost_per_unit: holding,
        result,
        comparison,
        discounted,
    })
}

pub async fn simulate(
    Extension(_tenant): Extension<TenantContext>,
    Json(body): Json<SimulationInput>,
) -> axum::response::Response {
    match run_scenario_simulation(&body) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
