//! What-if simulation of demand and lead-time shifts.

use serde::{Deserialize, Serialize};

use restock_core::numeric::{ensure_non_negative, round_to};
use restock_core::{DomainResult, ItemId};

use crate::reorder_point::reorder_point;
use crate::safety_stock::{DEFAULT_SERVICE_LEVEL, SafetyStockInput, safety_stock};

/// Days of demand added on top of the reorder point when sizing a scenario order.
const SCENARIO_COVER_DAYS: f64 = 30.0;

/// `(name, demand change %, lead-time change in days)`
const SCENARIOS: [(&str, f64, f64); 10] = [
    ("demand +10%", 10.0, 0.0),
    ("demand +20%", 20.0, 0.0),
    ("demand +30%", 30.0, 0.0),
    ("demand -10%", -10.0, 0.0),
    ("demand -20%", -20.0, 0.0),
    ("lead time +2d", 0.0, 2.0),
    ("lead time +5d", 0.0, 5.0),
    ("lead time -2d", 0.0, -2.0),
    ("worst: demand +20%, lead time +5d", 20.0, 5.0),
    ("best: demand -20%, lead time -2d", -20.0, -2.0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub item_id: ItemId,
    pub current_stock: i64,
    pub average_daily_demand: f64,
    pub demand_std_dev: f64,
    pub lead_time_days: f64,
    #[serde(default)]
    pub lead_time_std_dev: Option<f64>,
    #[serde(default = "default_service_level")]
    pub service_level: f64,
}

fn default_service_level() -> f64 {
    DEFAULT_SERVICE_LEVEL
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStockStatus {
    Sufficient,
    ReorderNeeded,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub demand_change_percent: f64,
    pub lead_time_change_days: f64,
    /// 1 decimal.
    pub adjusted_demand: f64,
    pub adjusted_lead_time: f64,
    pub safety_stock: i64,
    pub reorder_point: i64,
    pub stock_status: ScenarioStockStatus,
    pub required_order_quantity: i64,
    /// Current stock as a percentage of safety stock (0 without safety stock).
    pub safety_stock_ratio: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub worst_case: ScenarioResult,
    pub best_case: ScenarioResult,
    pub average_safety_stock: i64,
    pub average_reorder_point: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub item_id: ItemId,
    pub baseline: ScenarioResult,
    pub scenarios: Vec<ScenarioResult>,
    pub summary: SimulationSummary,
}

fn run_scenario(
    input: &SimulationInput,
    name: &str,
    demand_change_percent: f64,
    lead_time_change_days: f64,
) -> DomainResult<ScenarioResult> {
    let factor = 1.0 + demand_change_percent / 100.0;
    let demand = input.average_daily_demand * factor;
    let lead_time = (input.lead_time_days + lead_time_change_days).max(1.0);

    let mut ss_input = SafetyStockInput::new(demand, input.demand_std_dev * factor, lead_time)
        .with_service_level(input.service_level);
    ss_input.lead_time_std_dev = input.lead_time_std_dev;
    let ss = safety_stock(&ss_input)?.safety_stock;
    let rop = reorder_point(demand, lead_time, ss)?.reorder_point;

    let stock = input.current_stock;
    let stock_status = if (stock as f64) < ss as f64 * 0.5 {
        ScenarioStockStatus::Urgent
    } else if stock <= rop {
        ScenarioStockStatus::ReorderNeeded
    } else {
        ScenarioStockStatus::Sufficient
    };

    let required_order_quantity = match stock_status {
        ScenarioStockStatus::Sufficient => 0,
        _ => (rop as f64 + demand * SCENARIO_COVER_DAYS - stock as f64)
            .max(0.0)
            .ceil() as i64,
    };
    let safety_stock_ratio = if ss > 0 {
        (stock as f64 / ss as f64 * 100.0).round() as i64
    } else {
        0
    };

    Ok(ScenarioResult {
        name: name.to_string(),
        demand_change_percent,
        lead_time_change_days,
        adjusted_demand: round_to(demand, 1),
        adjusted_lead_time: lead_time,
        safety_stock: ss,
        reorder_point: rop,
        stock_status,
        required_order_quantity,
        safety_stock_ratio,
    })
}

/// Baseline plus ten fixed demand / lead-time scenarios.
///
/// Worst and best cases are picked by reorder point (first one wins ties);
/// averages cover the baseline and all scenarios and are rounded up.
pub fn run_scenario_simulation(input: &SimulationInput) -> DomainResult<SimulationResult> {
    ensure_non_negative("current_stock", input.current_stock as f64)?;
    let baseline = run_scenario(input, "baseline", 0.0, 0.0)?;
    let scenarios = SCENARIOS
        .iter()
        .map(|(name, demand, lead)| run_scenario(input, name, *demand, *lead))
        .collect::<DomainResult<Vec<_>>>()?;

    let mut worst = &scenarios[0];
    let mut best = &scenarios[0];
    for s in &scenarios[1..] {
        if s.reorder_point > worst.reorder_point {
            worst = s;
        }
        if s.reorder_point < best.reorder_point {
            best = s;
        }
    }

    let count = (scenarios.len() + 1) as f64;
    let all = || std::iter::once(&baseline).chain(scenarios.iter());
    let average_safety_stock = (all().map(|s| s.safety_stock as f64).sum::<f64>() / count).ceil() as i64;
    let average_reorder_point = (all().map(|s| s.reorder_point as f64).sum::<f64>() / count).ceil() as i64;

    let summary = SimulationSummary {
        worst_case: worst.clone(),
        best_case: best.clone(),
        average_safety_stock,
        average_reorder_point,
    };

    Ok(SimulationResult {
        item_id: input.item_id,
        baseline,
        scenarios,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(current_stock: i64) -> SimulationInput {
        SimulationInput {
            item_id: ItemId::new(),
            current_stock,
            average_daily_demand: 10.0,
            demand_std_dev: 3.0,
            lead_time_days: 7.0,
            lead_time_std_dev: None,
            service_level: 0.95,
        }
    }

    #[test]
    fn baseline_matches_direct_policy() {
        let r = run_scenario_simulation(&input(500)).unwrap();
        // 1.65 × 3 × √7 ≈ 13.1 → 14; ROP = 70 + 14 = 84
        assert_eq!(r.baseline.safety_stock, 14);
        assert_eq!(r.baseline.reorder_point, 84);
        assert_eq!(r.baseline.stock_status, ScenarioStockStatus::Sufficient);
        assert_eq!(r.scenarios.len(), 10);
    }

    #[test]
    fn worst_and_best_by_reorder_point() {
        let r = run_scenario_simulation(&input(50)).unwrap();
        assert_eq!(r.summary.worst_case.name, "worst: demand +20%, lead time +5d");
        assert_eq!(r.summary.best_case.name, "best: demand -20%, lead time -2d");
        assert!(r.summary.average_reorder_point >= r.summary.best_case.reorder_point);
        assert_eq!(r.baseline.stock_status, ScenarioStockStatus::ReorderNeeded);
        assert!(r.baseline.required_order_quantity > 0);
    }

    #[test]
    fn lead_time_never_drops_below_one_day() {
        let mut short = input(10);
        short.lead_time_days = 1.0;
        let r = run_scenario_simulation(&short).unwrap();
        assert!(r.scenarios.iter().all(|s| s.adjusted_lead_time >= 1.0));
    }
}
