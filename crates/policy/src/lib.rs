//! `restock-policy`
//!
//! **Responsibility:** inventory-policy parameters from demand statistics and costs.
//!
//! - Safety stock (service-level Z-score, simplified or full formula)
//! - Reorder point and days until reorder
//! - Economic order quantity, holding cost, quantity discounts
//! - Order-quantity decision (EOQ or target days of cover, MOQ, order multiple)
//! - What-if scenario simulation
//!
//! Safety stock, reorder point and EOQ always round up. Negative inputs are a
//! caller bug and fail with [`DomainError::Validation`](restock_core::DomainError);
//! zero demand degrades to zero results.

pub mod eoq;
pub mod order_quantity;
pub mod reorder_point;
pub mod safety_stock;
pub mod simulation;
pub mod zscore;

pub use eoq::{
    DiscountBracket, DiscountedEoq, EoqResult, HoldingCostInput, QuantityCostComparison,
    compare_order_quantity_cost, eoq, eoq_with_discounts,
};
pub use order_quantity::{OrderQuantityInput, OrderQuantityResult, QuantityMethod, order_quantity};
pub use reorder_point::{ReorderPointResult, days_until_reorder, reorder_point, should_reorder};
pub use safety_stock::{
    SafetyStockInput, SafetyStockMethod, SafetyStockResult, safety_stock, simple_safety_stock,
};
pub use simulation::{
    ScenarioResult, ScenarioStockStatus, SimulationInput, SimulationResult, SimulationSummary,
    run_scenario_simulation,
};
pub use zscore::z_score;
