use axum::{Router, routing::post};

pub mod classification;
pub mod common;
pub mod forecast;
pub mod kpi;
pub mod policy;
pub mod replenishment;
pub mod system;

/// Router for all tenant-scoped endpoints (mounted under `/v1`).
pub fn router() -> Router {
    Router::new()
        .route("/replenishment/evaluate", post(replenishment::evaluate))
        .route("/optimization/advise", post(replenishment::advise))
        .route("/kpi/proposals", post(kpi::proposals))
        .route("/forecast", post(forecast::forecast))
        .route("/classify", post(classification::classify))
        .route("/policy/eoq", post(policy::eoq))
        .route("/policy/simulate", post(policy::simulate))
}
