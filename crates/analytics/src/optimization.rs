//! Inventory optimization advisories: excess reduction, order-cycle tuning and
//! EOQ cost savings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use restock_core::numeric::{ensure_non_negative, round_to};
use restock_core::{DomainResult, ItemId};
use restock_inventory::{AbcGrade, CatalogItem, CombinedGrade, InventoryStatus, XyzGrade};
use restock_policy::eoq::DAYS_PER_YEAR;
use restock_policy::{HoldingCostInput, compare_order_quantity_cost, eoq};

use crate::config::AnalyticsConfig;

/// Stock above `SS × 3` counts as excess.
const EXCESS_CEILING_FACTOR: f64 = 3.0;
/// Cycle differences below this many days are not worth an advisory.
const MIN_CYCLE_DIFFERENCE_DAYS: i64 = 7;
const MIN_SAVINGS_PERCENT: f64 = 5.0;
const TOP_ADVISORIES: usize = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    ExcessReduction,
    OrderFrequency,
    EoqCostSaving,
}

/// Declared high → low so the derived ordering sorts most important first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub item_id: ItemId,
    pub sku: String,
    pub kind: AdvisoryKind,
    pub priority: AdvisoryPriority,
    pub current: String,
    pub recommended: String,
    pub message: String,
    /// Estimated yearly savings in currency units, when quantifiable.
    pub estimated_annual_savings: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationInput {
    pub item: CatalogItem,
    pub average_daily_demand: f64,
    /// Quantity the item is usually ordered in, if known.
    #[serde(default)]
    pub current_order_quantity: Option<i64>,
}

/// Recommended review cycle per combined grade.
pub fn recommended_cycle_days(grade: CombinedGrade) -> i64 {
    use AbcGrade::*;
    use XyzGrade::*;
    match (grade.abc, grade.xyz) {
        (A, X) => 7,
        (A, Y) => 14,
        (A, Z) => 7,
        (B, X) => 14,
        (B, Y) => 21,
        (B, Z) => 14,
        (C, _) => 30,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InventoryOptimizer {
    ordering_cost: f64,
    holding_rate: f64,
}

impl Default for InventoryOptimizer {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

impl InventoryOptimizer {
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            ordering_cost: config.ordering_cost,
            holding_rate: config.holding_rate,
        }
    }

    /// All advisories for one item, high priority first.
    pub fn advise(&self, input: &OptimizationInput) -> DomainResult<Vec<Advisory>> {
        input.item.validate()?;
        ensure_non_negative("average_daily_demand", input.average_daily_demand)?;

        let mut advisories: Vec<Advisory> = [
            self.excess_reduction(input),
            self.order_frequency(input),
            self.eoq_cost_saving(input)?,
        ]
        .into_iter()
        .flatten()
        .collect();
        advisories.sort_by_key(|a| a.priority);
        Ok(advisories)
    }

    pub fn excess_reduction(&self, input: &OptimizationInput) -> Option<Advisory> {
        let item = &input.item;
        let status = item.status();
        if !status.is_overstocked() {
            return None;
        }
        let excess = item.current_stock as f64 - item.safety_stock as f64 * EXCESS_CEILING_FACTOR;
        if excess <= 0.0 {
            return None;
        }
        let excess_value = (excess * item.unit_cost).round();
        let days_of_excess = round_to(excess / input.average_daily_demand.max(1.0), 1);
        let priority = if status == InventoryStatus::Overstock {
            AdvisoryPriority::High
        } else {
            AdvisoryPriority::Medium
        };

        Some(Advisory {
            item_id: item.id,
            sku: item.sku.clone(),
            kind: AdvisoryKind::ExcessReduction,
            priority,
            current: format!("{} units ({status})", item.current_stock),
            recommended: format!("{} units", (item.safety_stock as f64 * EXCESS_CEILING_FACTOR).round()),
            message: format!(
                "reduce stock by {} units (about {days_of_excess} days of demand) to free {excess_value} in working capital",
                excess.round()
            ),
            estimated_annual_savings: Some((excess_value * self.holding_rate).round()),
        })
    }

    /// Needs both grades; without a current order cycle the advisory is low priority.
    pub fn order_frequency(&self, input: &OptimizationInput) -> Option<Advisory> {
        let item = &input.item;
        let grade = CombinedGrade::new(item.abc_grade?, item.xyz_grade?);
        let recommended = recommended_cycle_days(grade);

        let current_cycle = match input.current_order_quantity {
            Some(q) if q > 0 && input.average_daily_demand > 0.0 => {
                Some((q as f64 / input.average_daily_demand).round() as i64)
            }
            _ => None,
        };

        let priority = match current_cycle {
            Some(current) if (current - recommended).abs() < MIN_CYCLE_DIFFERENCE_DAYS => return None,
            Some(_) if grade.abc == AbcGrade::A => AdvisoryPriority::High,
            Some(_) => AdvisoryPriority::Medium,
            None => AdvisoryPriority::Low,
        };

        let message = match current_cycle {
            Some(current) if current > recommended => {
                format!("shorten the order cycle by {} days for a {grade} item", current - recommended)
            }
            Some(current) => {
                format!("extend the order cycle by {} days for a {grade} item", recommended - current)
            }
            None => format!("set up a {recommended}-day review cycle for a {grade} item"),
        };

        Some(Advisory {
            item_id: item.id,
            sku: item.sku.clone(),
            kind: AdvisoryKind::OrderFrequency,
            priority,
            current: current_cycle.map_or_else(|| "not set".to_string(), |d| format!("{d} days")),
            recommended: format!("{recommended} days"),
            message,
            estimated_annual_savings: None,
        })
    }

    pub fn eoq_cost_saving(&self, input: &OptimizationInput) -> DomainResult<Option<Advisory>> {
        let item = &input.item;
        let annual_demand = (input.average_daily_demand * DAYS_PER_YEAR).round();
        let Some(current_quantity) = input.current_order_quantity.filter(|q| *q > 0) else {
            return Ok(None);
        };
        if annual_demand <= 0.0 {
            return Ok(None);
        }

        let holding = HoldingCostInput::new(item.unit_cost)
            .with_holding_rate(self.holding_rate)
            .annual_cost()?;
        let optimal = eoq(annual_demand, self.ordering_cost, holding)?;
        let comparison = compare_order_quantity_cost(
            &optimal,
            current_quantity as f64,
            annual_demand,
            self.ordering_cost,
            holding,
        )?;

        let savings_percent = comparison.cost_increase_percent.abs();
        if savings_percent < MIN_SAVINGS_PERCENT || comparison.cost_difference <= 0.0 {
            return Ok(None);
        }
        let priority = if savings_percent >= 20.0 {
            AdvisoryPriority::High
        } else if savings_percent >= 10.0 {
            AdvisoryPriority::Medium
        } else {
            AdvisoryPriority::Low
        };

        Ok(Some(Advisory {
            item_id: item.id,
            sku: item.sku.clone(),
            kind: AdvisoryKind::EoqCostSaving,
            priority,
            current: format!("{current_quantity} units (annual cost {})", comparison.actual_annual_cost),
            recommended: format!("{} units (annual cost {})", optimal.eoq, optimal.total_annual_cost),
            message: format!(
                "order {} instead of {current_quantity} units, about {} orders a year every {} days, to cut inventory cost by {}%",
                optimal.eoq,
                optimal.orders_per_year,
                optimal.order_cycle_days,
                savings_percent.round()
            ),
            estimated_annual_savings: Some(comparison.cost_difference),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub total: usize,
    pub by_kind: BTreeMap<AdvisoryKind, usize>,
    pub by_priority: BTreeMap<AdvisoryPriority, usize>,
    pub total_estimated_savings: f64,
    /// Highest priority first, then largest savings.
    pub top: Vec<Advisory>,
}

pub fn summarize(advisories: &[Advisory]) -> OptimizationSummary {
    let mut by_kind = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    let mut total_estimated_savings = 0.0;
    for a in advisories {
        *by_kind.entry(a.kind).or_insert(0) += 1;
        *by_priority.entry(a.priority).or_insert(0) += 1;
        total_estimated_savings += a.estimated_annual_savings.unwrap_or(0.0);
    }

    let mut top = advisories.to_vec();
    top.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then_with(|| {
            b.estimated_annual_savings
                .unwrap_or(0.0)
                .total_cmp(&a.estimated_annual_savings.unwrap_or(0.0))
        })
    });
    top.truncate(TOP_ADVISORIES);

    OptimizationSummary {
        total: advisories.len(),
        by_kind,
        by_priority,
        total_estimated_savings: total_estimated_savings.round(),
        top,
    }
}
