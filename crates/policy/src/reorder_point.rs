use serde::{Deserialize, Serialize};

use restock_core::DomainResult;
use restock_core::numeric::{ensure_non_negative, to_units};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPointResult {
    pub reorder_point: i64,
    /// `ceil(d̄ × LT)`
    pub lead_time_demand: i64,
    pub safety_stock: i64,
}

/// `ROP = ceil(d̄ × LT + SS)`.
pub fn reorder_point(
    average_daily_demand: f64,
    lead_time_days: f64,
    safety_stock: i64,
) -> DomainResult<ReorderPointResult> {
    ensure_non_negative("average_daily_demand", average_daily_demand)?;
    ensure_non_negative("lead_time_days", lead_time_days)?;
    ensure_non_negative("safety_stock", safety_stock as f64)?;

    let lead_time_demand = average_daily_demand * lead_time_days;
    Ok(ReorderPointResult {
        reorder_point: to_units("reorder_point", (lead_time_demand + safety_stock as f64).ceil())?,
        lead_time_demand: to_units("lead_time_demand", lead_time_demand.ceil())?,
        safety_stock,
    })
}

pub fn should_reorder(current_stock: i64, reorder_point: i64) -> bool {
    current_stock <= reorder_point
}

/// Whole days until stock falls to the reorder point.
///
/// `Some(0)` when already at or below it; `None` when demand is not positive.
pub fn days_until_reorder(current_stock: i64, reorder_point: i64, average_daily_demand: f64) -> Option<i64> {
    if average_daily_demand.is_nan() || average_daily_demand <= 0.0 {
        return None;
    }
    if should_reorder(current_stock, reorder_point) {
        return Some(0);
    }
    Some((current_stock.saturating_sub(reorder_point) as f64 / average_daily_demand).floor() as i64)
}
