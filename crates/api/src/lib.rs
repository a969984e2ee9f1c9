//! HTTP binding for the replenishment engine: routing, tenant context and
//! JSON mapping. All decisions are made by `restock-analytics`.

pub mod app;
pub mod context;
pub mod middleware;
